//! Bidirectional tag registry.
//!
//! Tracks which cached queries provide which tags, so a set of invalidated
//! tags can be resolved to the affected query keys without scanning the store.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::RwLock;

use super::keys::QueryKey;
use super::lock::{rw_read, rw_write};
use super::tags::{CacheTag, TagSet};

const SOURCE: &str = "cache::registry";

/// Tracks tag → query keys and query key → tags mappings.
pub struct TagRegistry {
    tag_to_keys: RwLock<HashMap<CacheTag, HashSet<QueryKey>>>,
    key_to_tags: RwLock<HashMap<QueryKey, TagSet>>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self {
            tag_to_keys: RwLock::new(HashMap::new()),
            key_to_tags: RwLock::new(HashMap::new()),
        }
    }

    /// Index `key` under `tags`, replacing whatever it provided before.
    ///
    /// A refetch can change the provided set (list membership changes), so
    /// stale forward entries are dropped first.
    pub fn register(&self, key: QueryKey, tags: TagSet) {
        let mut t2k = rw_write(&self.tag_to_keys, SOURCE, "register.tag_to_keys");
        let mut k2t = rw_write(&self.key_to_tags, SOURCE, "register.key_to_tags");

        if let Some(previous) = k2t.remove(&key) {
            detach(&mut t2k, &key, previous);
        }
        for tag in &tags {
            t2k.entry(tag.clone()).or_default().insert(key.clone());
        }
        k2t.insert(key, tags);
    }

    /// Every key that provides at least one of `tags`, each listed once.
    pub fn keys_for_tags(&self, tags: &TagSet) -> BTreeSet<QueryKey> {
        let t2k = rw_read(&self.tag_to_keys, SOURCE, "keys_for_tags");
        tags.iter()
            .filter_map(|tag| t2k.get(tag))
            .flatten()
            .cloned()
            .collect()
    }

    pub fn tags_for_key(&self, key: &QueryKey) -> TagSet {
        rw_read(&self.key_to_tags, SOURCE, "tags_for_key")
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Remove a key and clean up its tag mappings.
    ///
    /// Called when a cache entry is evicted.
    pub fn unregister(&self, key: &QueryKey) {
        let mut t2k = rw_write(&self.tag_to_keys, SOURCE, "unregister.tag_to_keys");
        let mut k2t = rw_write(&self.key_to_tags, SOURCE, "unregister.key_to_tags");

        if let Some(tags) = k2t.remove(key) {
            detach(&mut t2k, key, tags);
        }
    }

    pub fn clear(&self) {
        rw_write(&self.tag_to_keys, SOURCE, "clear.tag_to_keys").clear();
        rw_write(&self.key_to_tags, SOURCE, "clear.key_to_tags").clear();
    }

    pub fn tag_count(&self) -> usize {
        rw_read(&self.tag_to_keys, SOURCE, "tag_count").len()
    }

    pub fn key_count(&self) -> usize {
        rw_read(&self.key_to_tags, SOURCE, "key_count").len()
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn detach(t2k: &mut HashMap<CacheTag, HashSet<QueryKey>>, key: &QueryKey, tags: TagSet) {
    for tag in tags {
        if let Some(keys) = t2k.get_mut(&tag) {
            keys.remove(key);
            if keys.is_empty() {
                t2k.remove(&tag);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TagType;

    fn dashboard(project: &str) -> (QueryKey, TagSet) {
        (
            QueryKey::new(
                "learning_path.dashboard",
                format!("/learning-paths/{project}/dashboard"),
            ),
            TagSet::from([
                CacheTag::id(TagType::ProjectDashboard, project),
                CacheTag::id(TagType::ProjectLearningPath, project),
            ]),
        )
    }

    #[test]
    fn register_and_lookup() {
        let registry = TagRegistry::new();
        let (key, tags) = dashboard("p1");
        registry.register(key.clone(), tags.clone());

        let found = registry.keys_for_tags(&TagSet::from([CacheTag::id(
            TagType::ProjectDashboard,
            "p1",
        )]));
        assert!(found.contains(&key));
        assert_eq!(registry.tags_for_key(&key), tags);
    }

    #[test]
    fn exact_id_does_not_match_other_projects() {
        let registry = TagRegistry::new();
        let (k1, t1) = dashboard("p1");
        let (k2, t2) = dashboard("p2");
        registry.register(k1.clone(), t1);
        registry.register(k2.clone(), t2);

        let found = registry.keys_for_tags(&TagSet::from([CacheTag::id(
            TagType::ProjectDashboard,
            "p1",
        )]));
        assert_eq!(found, BTreeSet::from([k1]));
    }

    #[test]
    fn overlapping_tags_resolve_each_key_once() {
        let registry = TagRegistry::new();
        let (key, tags) = dashboard("p1");
        registry.register(key.clone(), tags.clone());

        let found = registry.keys_for_tags(&tags);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn reregister_replaces_previous_tags() {
        let registry = TagRegistry::new();
        let key = QueryKey::new("projects.list", "/projects");
        registry.register(
            key.clone(),
            TagSet::from([
                CacheTag::list(TagType::Project),
                CacheTag::id(TagType::Project, "old"),
            ]),
        );
        registry.register(
            key.clone(),
            TagSet::from([
                CacheTag::list(TagType::Project),
                CacheTag::id(TagType::Project, "new"),
            ]),
        );

        let old = TagSet::from([CacheTag::id(TagType::Project, "old")]);
        assert!(registry.keys_for_tags(&old).is_empty());
        assert_eq!(registry.tag_count(), 2);
    }

    #[test]
    fn unregister_cleans_up_mappings() {
        let registry = TagRegistry::new();
        let (key, tags) = dashboard("p1");
        registry.register(key.clone(), tags);
        assert_eq!(registry.key_count(), 1);
        assert_eq!(registry.tag_count(), 2);

        registry.unregister(&key);
        assert_eq!(registry.key_count(), 0);
        assert_eq!(registry.tag_count(), 0);
    }

    #[test]
    fn clear_removes_all_mappings() {
        let registry = TagRegistry::new();
        let (key, tags) = dashboard("p1");
        registry.register(key, tags);

        registry.clear();
        assert_eq!(registry.key_count(), 0);
        assert_eq!(registry.tag_count(), 0);
    }
}
