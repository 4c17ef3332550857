//! Publishes invalidations for successful writes.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::config::CacheConfig;
use super::consumer::CacheConsumer;
use super::events::EventQueue;
use super::tags::TagSet;
use crate::endpoints::Mutation;

/// Wraps the event queue and consumer for the write path.
///
/// ```ignore
/// // After a milestone was created on the server:
/// trigger.mutation_succeeded(&mutation).await;
/// ```
pub struct CacheTrigger {
    config: CacheConfig,
    queue: Arc<EventQueue>,
    consumer: Arc<CacheConsumer>,
}

impl CacheTrigger {
    pub fn new(config: CacheConfig, queue: Arc<EventQueue>, consumer: Arc<CacheConsumer>) -> Self {
        Self {
            config,
            queue,
            consumer,
        }
    }

    /// Publish `tags` on behalf of `mutation` and optionally consume now.
    ///
    /// Returns the event id, or `None` when the cache is disabled or there
    /// was nothing to invalidate.
    pub async fn trigger(
        &self,
        mutation: &'static str,
        tags: TagSet,
        consume_now: bool,
    ) -> Option<Uuid> {
        if !self.config.enabled {
            debug!(mutation, "Cache trigger skipped: cache disabled");
            return None;
        }
        if tags.is_empty() {
            debug!(mutation, "Cache trigger skipped: no tags");
            return None;
        }

        let id = self.queue.publish(mutation, tags);

        if consume_now {
            self.consumer.consume_all().await;
        }
        Some(id)
    }

    /// Invalidate everything `mutation` declares. Call only after the server
    /// confirmed the write.
    pub async fn mutation_succeeded(&self, mutation: &Mutation) -> Option<Uuid> {
        self.trigger(mutation.name(), mutation.invalidates(), true)
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::cache::QueryCache;
    use crate::client::testing::ScriptedTransport;
    use crate::endpoints::{LearningPathMutation, LearningPathQuery, Query};

    fn build(config: CacheConfig) -> (Arc<QueryCache>, Arc<EventQueue>, CacheTrigger) {
        let cache = Arc::new(QueryCache::new(config.clone()));
        let queue = Arc::new(EventQueue::new());
        let consumer = Arc::new(CacheConsumer::new(
            config.clone(),
            Arc::clone(&cache),
            Arc::clone(&queue),
            Arc::new(ScriptedTransport::default()),
        ));
        let trigger = CacheTrigger::new(config, Arc::clone(&queue), consumer);
        (cache, queue, trigger)
    }

    fn delete_milestone() -> Mutation {
        LearningPathMutation::DeleteMilestone {
            project_id: "p1".into(),
            milestone_id: "m1".into(),
        }
        .into()
    }

    #[tokio::test]
    async fn mutation_success_consumes_immediately() {
        let (cache, queue, trigger) = build(CacheConfig::default());
        let query: Query = LearningPathQuery::Milestone {
            project_id: "p1".into(),
            milestone_id: "m1".into(),
        }
        .into();
        cache.fill(&query, json!({"success": true}));

        assert!(trigger.mutation_succeeded(&delete_milestone()).await.is_some());
        assert!(queue.is_empty());
        assert!(cache.fresh(&query.key()).is_none());
    }

    #[tokio::test]
    async fn disabled_cache_publishes_nothing() {
        let (_, queue, trigger) = build(CacheConfig::disabled());
        assert!(trigger.mutation_succeeded(&delete_milestone()).await.is_none());
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn deferred_trigger_leaves_event_queued() {
        let (_, queue, trigger) = build(CacheConfig::default());
        let mutation = delete_milestone();
        trigger
            .trigger(mutation.name(), mutation.invalidates(), false)
            .await;
        assert_eq!(queue.len(), 1);
    }
}
