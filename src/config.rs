//! Configuration Module
//!
//! Cache-wide and per-write settings. All configuration is programmatic;
//! callers construct a [`CacheConfig`] and hand it to the cache.

use std::time::Duration;

/// Cache-wide configuration parameters.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Maximum total estimated size in bytes across all entries
    pub max_size_bytes: usize,
    /// Default TTL in milliseconds for entries without an explicit TTL
    pub default_ttl_ms: u64,
    /// Interval between background expiry sweeps
    pub expiry_sweep_interval: Duration,
    /// Interval between background capacity sweeps
    pub capacity_sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            max_size_bytes: 50 * 1024 * 1024,
            default_ttl_ms: 300_000,
            expiry_sweep_interval: Duration::from_secs(5 * 60),
            capacity_sweep_interval: Duration::from_secs(10 * 60),
        }
    }
}

/// Per-write settings for a single `set` call.
///
/// The ceiling overrides apply only to the capacity check triggered by
/// that write; the cache-wide ceilings stay in force for the sweeps.
#[derive(Debug, Clone, Default)]
pub struct EntryConfig {
    /// TTL in milliseconds (cache default when None)
    pub ttl_ms: Option<u64>,
    /// Tags for group invalidation
    pub tags: Vec<String>,
    /// One-shot override of the size ceiling
    pub max_size_bytes: Option<usize>,
    /// One-shot override of the entry-count ceiling
    pub max_entries: Option<usize>,
}

impl EntryConfig {
    /// Creates a config with just a TTL.
    pub fn with_ttl(ttl_ms: u64) -> Self {
        Self {
            ttl_ms: Some(ttl_ms),
            ..Self::default()
        }
    }

    /// Creates a config with a TTL and invalidation tags.
    pub fn with_ttl_and_tags<S: Into<String>>(ttl_ms: u64, tags: Vec<S>) -> Self {
        Self {
            ttl_ms: Some(ttl_ms),
            tags: tags.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.max_size_bytes, 50 * 1024 * 1024);
        assert_eq!(config.default_ttl_ms, 300_000);
        assert_eq!(config.expiry_sweep_interval, Duration::from_secs(300));
        assert_eq!(config.capacity_sweep_interval, Duration::from_secs(600));
    }

    #[test]
    fn test_entry_config_with_ttl() {
        let config = EntryConfig::with_ttl(60_000);
        assert_eq!(config.ttl_ms, Some(60_000));
        assert!(config.tags.is_empty());
        assert!(config.max_size_bytes.is_none());
        assert!(config.max_entries.is_none());
    }

    #[test]
    fn test_entry_config_with_ttl_and_tags() {
        let config = EntryConfig::with_ttl_and_tags(60_000, vec!["users", "collection"]);
        assert_eq!(config.ttl_ms, Some(60_000));
        assert_eq!(config.tags, vec!["users".to_string(), "collection".to_string()]);
    }
}
