//! Bounded storage for query results.

use std::sync::{Arc, RwLock};

use lru::LruCache;
use metrics::counter;
use serde_json::Value;
use time::OffsetDateTime;

use super::config::CacheConfig;
use super::keys::QueryKey;
use super::lock::{rw_read, rw_write};
use super::tags::TagSet;
use super::{METRIC_CACHE_EVICT, METRIC_CACHE_HIT, METRIC_CACHE_MISS};
use crate::endpoints::Query;

const SOURCE: &str = "cache::store";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Fresh,
    /// Invalidated by a write; the next read refetches.
    Stale,
}

/// One cached read: the raw response envelope plus the tags it provides.
#[derive(Debug, Clone)]
pub struct CachedQuery {
    pub query: Query,
    pub value: Arc<Value>,
    pub tags: TagSet,
    pub state: EntryState,
    pub fetched_at: OffsetDateTime,
}

impl CachedQuery {
    pub fn fresh(query: Query, value: Arc<Value>, tags: TagSet) -> Self {
        Self {
            query,
            value,
            tags,
            state: EntryState::Fresh,
            fetched_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn is_stale(&self) -> bool {
        self.state == EntryState::Stale
    }
}

/// LRU store keyed by [`QueryKey`].
pub struct QueryStore {
    entries: RwLock<LruCache<QueryKey, CachedQuery>>,
}

impl QueryStore {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(config.query_limit_non_zero())),
        }
    }

    /// Look up an entry and promote it in LRU order. Stale entries are
    /// returned too; callers decide whether to refetch.
    pub fn get(&self, key: &QueryKey) -> Option<CachedQuery> {
        let entry = rw_write(&self.entries, SOURCE, "get").get(key).cloned();
        match &entry {
            Some(found) if !found.is_stale() => {
                counter!(METRIC_CACHE_HIT, "endpoint" => key.endpoint).increment(1)
            }
            _ => counter!(METRIC_CACHE_MISS, "endpoint" => key.endpoint).increment(1),
        }
        entry
    }

    /// Read without touching LRU order or metrics.
    pub fn peek(&self, key: &QueryKey) -> Option<CachedQuery> {
        rw_read(&self.entries, SOURCE, "peek").peek(key).cloned()
    }

    /// Insert or replace an entry. Returns the key evicted to make room, if any.
    pub fn insert(&self, key: QueryKey, entry: CachedQuery) -> Option<QueryKey> {
        let evicted = rw_write(&self.entries, SOURCE, "insert")
            .push(key.clone(), entry)
            .map(|(evicted_key, _)| evicted_key)
            .filter(|evicted_key| *evicted_key != key);
        if evicted.is_some() {
            counter!(METRIC_CACHE_EVICT).increment(1);
        }
        evicted
    }

    /// Flag an entry stale. Returns the query so the caller can refetch it.
    pub fn mark_stale(&self, key: &QueryKey) -> Option<Query> {
        let mut entries = rw_write(&self.entries, SOURCE, "mark_stale");
        let entry = entries.peek_mut(key)?;
        entry.state = EntryState::Stale;
        Some(entry.query.clone())
    }

    pub fn remove(&self, key: &QueryKey) -> Option<CachedQuery> {
        rw_write(&self.entries, SOURCE, "remove").pop(key)
    }

    pub fn clear(&self) {
        rw_write(&self.entries, SOURCE, "clear").clear();
    }

    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use serde_json::json;

    use super::*;
    use crate::cache::{CacheTag, TagType};
    use crate::endpoints::ProjectQuery;

    fn project(id: &str) -> (QueryKey, CachedQuery) {
        let query = Query::from(ProjectQuery::Get {
            project_id: id.to_string(),
        });
        let tags = query.provides(&json!({}));
        let entry = CachedQuery::fresh(
            query.clone(),
            Arc::new(json!({"success": true, "data": {"id": id}})),
            tags,
        );
        (query.key(), entry)
    }

    #[test]
    fn insert_get_and_mark_stale() {
        let store = QueryStore::new(&CacheConfig::default());
        let (key, entry) = project("p1");

        assert!(store.get(&key).is_none());
        assert!(store.insert(key.clone(), entry).is_none());

        let cached = store.get(&key).expect("cached entry");
        assert!(!cached.is_stale());
        assert!(
            cached
                .tags
                .contains(&CacheTag::id(TagType::Project, "p1"))
        );

        let query = store.mark_stale(&key).expect("entry present");
        assert_eq!(query.key(), key);
        assert!(store.peek(&key).expect("still present").is_stale());
    }

    #[test]
    fn mark_stale_on_missing_key_is_none() {
        let store = QueryStore::new(&CacheConfig::default());
        let (key, _) = project("p1");
        assert!(store.mark_stale(&key).is_none());
    }

    #[test]
    fn lru_eviction_reports_evicted_key() {
        let store = QueryStore::new(&CacheConfig {
            query_limit: 2,
            ..Default::default()
        });
        let (k1, e1) = project("p1");
        let (k2, e2) = project("p2");
        let (k3, e3) = project("p3");

        store.insert(k1.clone(), e1);
        store.insert(k2.clone(), e2);
        assert!(store.get(&k1).is_some());

        // p2 is now least recently used.
        assert_eq!(store.insert(k3.clone(), e3), Some(k2.clone()));
        assert!(store.peek(&k2).is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn replacing_same_key_is_not_an_eviction() {
        let store = QueryStore::new(&CacheConfig {
            query_limit: 1,
            ..Default::default()
        });
        let (key, entry) = project("p1");
        store.insert(key.clone(), entry.clone());
        assert!(store.insert(key, entry).is_none());
    }

    #[test]
    fn store_recovers_from_poisoned_lock() {
        let store = QueryStore::new(&CacheConfig::default());
        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = store.entries.write().expect("lock should be acquired");
            panic!("poison store lock");
        }));

        let (key, entry) = project("p1");
        store.insert(key.clone(), entry);
        assert!(store.get(&key).is_some());
    }
}
