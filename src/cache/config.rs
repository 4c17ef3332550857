//! Query cache configuration.
//!
//! Populated from the `[cache]` table of `learnhub.toml`.

use std::num::NonZeroUsize;

use serde::Deserialize;

const DEFAULT_QUERY_LIMIT: usize = 256;
const DEFAULT_CONSUME_BATCH_LIMIT: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// When false every query goes to the network and nothing is retained.
    pub enabled: bool,
    /// Maximum cached query results before LRU eviction.
    pub query_limit: usize,
    /// Maximum invalidation events merged into one consumption pass.
    pub consume_batch_limit: usize,
    /// Re-fetch invalidated queries that still have live subscribers.
    pub refetch_on_invalidate: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            query_limit: DEFAULT_QUERY_LIMIT,
            consume_batch_limit: DEFAULT_CONSUME_BATCH_LIMIT,
            refetch_on_invalidate: true,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            query_limit: settings.query_limit.get(),
            consume_batch_limit: settings.consume_batch_limit.get(),
            refetch_on_invalidate: settings.refetch_on_invalidate,
        }
    }
}

impl CacheConfig {
    /// A configuration that bypasses the cache entirely.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Returns the query limit as NonZeroUsize, clamping to 1 if zero.
    pub fn query_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.query_limit).unwrap_or(NonZeroUsize::MIN)
    }

    /// Returns the batch limit, clamping to 1 if zero.
    pub fn consume_batch_limit_non_zero(&self) -> usize {
        self.consume_batch_limit.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.query_limit, 256);
        assert_eq!(config.consume_batch_limit, 64);
        assert!(config.refetch_on_invalidate);
    }

    #[test]
    fn disabled_keeps_other_defaults() {
        let config = CacheConfig::disabled();
        assert!(!config.enabled);
        assert_eq!(config.query_limit, 256);
    }

    #[test]
    fn zero_limits_clamp_to_one() {
        let config = CacheConfig {
            query_limit: 0,
            consume_batch_limit: 0,
            ..Default::default()
        };
        assert_eq!(config.query_limit_non_zero().get(), 1);
        assert_eq!(config.consume_batch_limit_non_zero(), 1);
    }

    #[test]
    fn partial_table_fills_defaults() {
        let config: CacheConfig =
            serde_json::from_str(r#"{"query_limit": 8}"#).expect("deserialize");
        assert_eq!(config.query_limit, 8);
        assert!(config.enabled);
        assert!(config.refetch_on_invalidate);
    }
}
