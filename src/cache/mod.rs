//! Tag-indexed query cache.
//!
//! Reads are stored under a [`QueryKey`] together with the [`CacheTag`]s they
//! provide. A successful write publishes the tags it invalidates; the
//! consumer resolves them through the [`TagRegistry`], marks the matching
//! entries stale and re-fetches the ones somebody is still watching.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! query_limit = 256
//! consume_batch_limit = 64
//! refetch_on_invalidate = true
//! ```

mod config;
mod consumer;
mod events;
mod keys;
mod lock;
mod planner;
mod registry;
mod store;
mod subscriptions;
mod tags;
mod trigger;

use std::sync::Arc;

use metrics::counter;
use serde_json::Value;
use tracing::{debug, warn};

pub use config::CacheConfig;
pub use consumer::CacheConsumer;
pub use events::{Epoch, EventQueue, InvalidationEvent};
pub use keys::QueryKey;
pub use planner::InvalidationPlan;
pub use registry::TagRegistry;
pub use store::{CachedQuery, EntryState, QueryStore};
pub use subscriptions::{QuerySnapshot, Subscription, Subscriptions};
pub use tags::{CacheTag, TagId, TagSet, TagType};
pub use trigger::CacheTrigger;

use crate::endpoints::Query;
use crate::error::{ClientError, FetchFailure};

pub(crate) const METRIC_CACHE_HIT: &str = "learnhub_cache_hit_total";
pub(crate) const METRIC_CACHE_MISS: &str = "learnhub_cache_miss_total";
pub(crate) const METRIC_CACHE_EVICT: &str = "learnhub_cache_evict_total";
pub(crate) const METRIC_CACHE_INVALIDATED: &str = "learnhub_cache_invalidated_total";
pub(crate) const METRIC_CACHE_REFETCH: &str = "learnhub_cache_refetch_total";
pub(crate) const METRIC_CACHE_QUEUE_LEN: &str = "learnhub_cache_event_queue_len";
pub(crate) const METRIC_CACHE_CONSUME_MS: &str = "learnhub_cache_consume_ms";

/// Cache state shared by the client, the consumer and subscribers.
///
/// Performs no I/O: callers fetch and hand results to [`QueryCache::fill`].
pub struct QueryCache {
    config: CacheConfig,
    store: QueryStore,
    registry: TagRegistry,
    subscriptions: Subscriptions,
}

impl QueryCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            store: QueryStore::new(&config),
            registry: TagRegistry::new(),
            subscriptions: Subscriptions::new(),
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Fresh cached envelope for `key`. Stale and missing entries yield `None`.
    pub fn fresh(&self, key: &QueryKey) -> Option<Arc<Value>> {
        if !self.is_enabled() {
            return None;
        }
        self.store
            .get(key)
            .filter(|entry| !entry.is_stale())
            .map(|entry| entry.value)
    }

    /// Inspect an entry without affecting LRU order.
    pub fn entry(&self, key: &QueryKey) -> Option<CachedQuery> {
        self.store.peek(key)
    }

    /// Store a fetched envelope, index it under the tags it provides and
    /// notify subscribers.
    pub fn fill(&self, query: &Query, envelope: Value) -> Arc<Value> {
        let key = query.key();
        let value = Arc::new(envelope);

        if self.is_enabled() {
            let tags = query.provides(&value);
            let entry = CachedQuery::fresh(query.clone(), Arc::clone(&value), tags.clone());
            if let Some(evicted) = self.store.insert(key.clone(), entry) {
                debug!(key = %evicted, "Evicted cached query");
                self.registry.unregister(&evicted);
            }
            self.registry.register(key.clone(), tags);
        }

        self.subscriptions
            .publish(&key, QuerySnapshot::Ready(Arc::clone(&value)));
        value
    }

    /// Report a failed fetch to subscribers; the entry itself is left as is.
    pub fn fail(&self, key: &QueryKey, err: &ClientError) {
        let last = self.store.peek(key).map(|entry| entry.value);
        self.subscriptions.publish(
            key,
            QuerySnapshot::Failed {
                last,
                error: FetchFailure::from(err),
            },
        );
    }

    /// Mark every entry providing any of `tags` stale.
    ///
    /// Returns the queries that still have live subscribers, each once.
    pub fn invalidate(&self, tags: &TagSet) -> Vec<Query> {
        let keys = self.registry.keys_for_tags(tags);
        let mut watched = Vec::new();

        for key in keys {
            let Some(query) = self.store.mark_stale(&key) else {
                warn!(key = %key, "Registry referenced a key missing from the store");
                self.registry.unregister(&key);
                continue;
            };
            counter!(METRIC_CACHE_INVALIDATED, "endpoint" => key.endpoint).increment(1);

            if self.subscriptions.is_watched(&key) {
                if let Some(entry) = self.store.peek(&key) {
                    self.subscriptions
                        .publish(&key, QuerySnapshot::Stale(entry.value));
                }
                watched.push(query);
            }
        }

        watched
    }

    /// Register interest in `query`, seeded with whatever is cached.
    pub fn subscribe(&self, query: &Query) -> Subscription {
        let key = query.key();
        let initial = match self.store.peek(&key) {
            Some(entry) if entry.is_stale() => QuerySnapshot::Stale(entry.value),
            Some(entry) => QuerySnapshot::Ready(entry.value),
            None => QuerySnapshot::Loading,
        };
        self.subscriptions.subscribe(key, initial)
    }

    pub fn is_watched(&self, key: &QueryKey) -> bool {
        self.subscriptions.is_watched(key)
    }

    /// Keys currently indexed under `tags`.
    pub fn keys_for_tags(&self, tags: &TagSet) -> Vec<QueryKey> {
        self.registry.keys_for_tags(tags).into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn clear(&self) {
        self.store.clear();
        self.registry.clear();
    }
}
