//! Invalidation events and the in-memory queue they travel through.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use metrics::gauge;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use super::METRIC_CACHE_QUEUE_LEN;
use super::lock::mutex_lock;
use super::tags::TagSet;

const SOURCE: &str = "cache::events";

/// Monotonic per-process ordering of events.
pub type Epoch = u64;

/// Published once per successful mutation.
#[derive(Debug, Clone)]
pub struct InvalidationEvent {
    /// Unique identifier; the planner drops repeats.
    pub id: Uuid,
    pub epoch: Epoch,
    /// Name of the mutation that produced this event.
    pub mutation: &'static str,
    pub tags: TagSet,
    pub timestamp: OffsetDateTime,
}

impl InvalidationEvent {
    pub fn new(mutation: &'static str, tags: TagSet, epoch: Epoch) -> Self {
        Self {
            id: Uuid::new_v4(),
            epoch,
            mutation,
            tags,
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}

/// FIFO queue between mutation success and cache consumption.
pub struct EventQueue {
    queue: Mutex<VecDeque<InvalidationEvent>>,
    epoch_counter: AtomicU64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            epoch_counter: AtomicU64::new(0),
        }
    }

    pub fn next_epoch(&self) -> Epoch {
        self.epoch_counter.fetch_add(1, Ordering::SeqCst)
    }

    /// Enqueue an event for `mutation`. Returns the event id.
    pub fn publish(&self, mutation: &'static str, tags: TagSet) -> Uuid {
        let event = InvalidationEvent::new(mutation, tags, self.next_epoch());
        let id = event.id;

        info!(
            event_id = %event.id,
            event_epoch = event.epoch,
            mutation,
            tag_count = event.tags.len(),
            "Invalidation event enqueued"
        );

        self.push(event);
        id
    }

    /// Enqueue a prepared event as-is, keeping its id.
    pub fn push(&self, event: InvalidationEvent) {
        let mut queue = mutex_lock(&self.queue, SOURCE, "push");
        queue.push_back(event);
        gauge!(METRIC_CACHE_QUEUE_LEN).set(queue.len() as f64);
    }

    /// Drain up to `limit` events in FIFO order.
    pub fn drain(&self, limit: usize) -> Vec<InvalidationEvent> {
        let mut queue = mutex_lock(&self.queue, SOURCE, "drain");
        let count = limit.min(queue.len());
        let events: Vec<_> = queue.drain(..count).collect();
        gauge!(METRIC_CACHE_QUEUE_LEN).set(queue.len() as f64);
        events
    }

    pub fn len(&self) -> usize {
        mutex_lock(&self.queue, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        mutex_lock(&self.queue, SOURCE, "clear").clear();
        gauge!(METRIC_CACHE_QUEUE_LEN).set(0.0);
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::*;
    use crate::cache::{CacheTag, TagType};

    fn tags(project: &str) -> TagSet {
        TagSet::from([CacheTag::id(TagType::ProjectDashboard, project)])
    }

    #[test]
    fn epoch_monotonicity() {
        let queue = EventQueue::new();
        let e1 = queue.next_epoch();
        let e2 = queue.next_epoch();
        assert!(e1 < e2);
    }

    #[test]
    fn publish_and_drain_in_fifo_order() {
        let queue = EventQueue::new();
        let first = queue.publish("learning_path.create_milestone", tags("p1"));
        let second = queue.publish("projects.update", tags("p2"));
        queue.publish("sessions.join", TagSet::new());
        assert_eq!(queue.len(), 3);

        let events = queue.drain(2);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, first);
        assert_eq!(events[1].id, second);
        assert!(events[0].epoch < events[1].epoch);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn drain_more_than_available() {
        let queue = EventQueue::new();
        queue.publish("projects.create", tags("p1"));
        assert_eq!(queue.drain(100).len(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn clear_queue() {
        let queue = EventQueue::new();
        queue.publish("projects.create", tags("p1"));
        queue.clear();
        assert!(queue.is_empty());
    }

    #[test]
    fn event_queue_recovers_from_poisoned_lock() {
        let queue = EventQueue::new();
        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = queue.queue.lock().expect("queue lock should be acquired");
            panic!("poison queue lock");
        }));

        queue.publish("projects.create", tags("p1"));
        assert_eq!(queue.len(), 1);
    }
}
