//! Live interest in query results.
//!
//! Each watched key owns one `watch` channel. A key counts as watched while at
//! least one [`Subscription`] for it is alive; dropping the handle releases
//! interest without cancelling anything already in flight.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::watch;

use super::keys::QueryKey;
use super::lock::mutex_lock;
use crate::error::FetchFailure;

const SOURCE: &str = "cache::subscriptions";

/// What a subscriber currently knows about one query.
#[derive(Debug, Clone, PartialEq)]
pub enum QuerySnapshot {
    /// Nothing fetched yet.
    Loading,
    Ready(Arc<Value>),
    /// Invalidated; a refetch is pending.
    Stale(Arc<Value>),
    /// The last fetch failed. `last` is the previous value, if any.
    Failed {
        last: Option<Arc<Value>>,
        error: FetchFailure,
    },
}

impl QuerySnapshot {
    /// Latest known envelope regardless of freshness.
    pub fn value(&self) -> Option<&Arc<Value>> {
        match self {
            QuerySnapshot::Loading => None,
            QuerySnapshot::Ready(value) | QuerySnapshot::Stale(value) => Some(value),
            QuerySnapshot::Failed { last, .. } => last.as_ref(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, QuerySnapshot::Ready(_))
    }
}

/// Handle returned by `subscribe`. Dropping it releases interest.
#[derive(Debug)]
pub struct Subscription {
    key: QueryKey,
    receiver: watch::Receiver<QuerySnapshot>,
}

impl Subscription {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn current(&self) -> QuerySnapshot {
        self.receiver.borrow().clone()
    }

    /// Wait for the next snapshot. `None` once the cache has been dropped.
    pub async fn changed(&mut self) -> Option<QuerySnapshot> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}

#[derive(Default)]
pub struct Subscriptions {
    channels: Mutex<HashMap<QueryKey, watch::Sender<QuerySnapshot>>>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join (or open) the channel for `key`. `initial` seeds a new channel and
    /// refreshes an existing one.
    pub fn subscribe(&self, key: QueryKey, initial: QuerySnapshot) -> Subscription {
        let mut channels = mutex_lock(&self.channels, SOURCE, "subscribe");
        let receiver = match channels.get(&key) {
            Some(sender) => {
                sender.send_replace(initial);
                sender.subscribe()
            }
            None => {
                let (sender, receiver) = watch::channel(initial);
                channels.insert(key.clone(), sender);
                receiver
            }
        };
        Subscription { key, receiver }
    }

    /// True while at least one live [`Subscription`] exists for `key`.
    pub fn is_watched(&self, key: &QueryKey) -> bool {
        let mut channels = mutex_lock(&self.channels, SOURCE, "is_watched");
        match channels.get(key) {
            Some(sender) if sender.receiver_count() > 0 => true,
            Some(_) => {
                channels.remove(key);
                false
            }
            None => false,
        }
    }

    /// Push a snapshot to subscribers of `key`; unwatched keys are skipped.
    pub fn publish(&self, key: &QueryKey, snapshot: QuerySnapshot) {
        let mut channels = mutex_lock(&self.channels, SOURCE, "publish");
        if let Some(sender) = channels.get(key) {
            if sender.receiver_count() == 0 {
                channels.remove(key);
            } else {
                sender.send_replace(snapshot);
            }
        }
    }

    /// Number of keys with at least one live subscriber.
    pub fn watched_count(&self) -> usize {
        mutex_lock(&self.channels, SOURCE, "watched_count")
            .values()
            .filter(|sender| sender.receiver_count() > 0)
            .count()
    }
}
