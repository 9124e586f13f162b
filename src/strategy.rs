//! Fetch Strategy Module
//!
//! Closed set of caching strategies selecting between stored and fresh data.

use serde::{Deserialize, Serialize};

use crate::config::EntryConfig;

// == Strategy ==
/// How `resolve` arbitrates between the store and the fetch function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Serve from the store when possible, fetch and store on a miss
    CacheFirst,
    /// Fetch first, fall back to a live stored value on failure
    NetworkFirst,
    /// Serve a stored value immediately and refresh it in the background
    StaleWhileRevalidate,
    /// Always fetch; the store is neither read nor written
    NetworkOnly,
    /// Serve only from the store; a miss is an error
    CacheOnly,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::CacheFirst
    }
}

// == Resolve Config ==
/// Per-call settings for `resolve`.
#[derive(Debug, Clone, Default)]
pub struct ResolveConfig {
    /// Strategy arbitrating between store and fetch
    pub strategy: Strategy,
    /// TTL in milliseconds for values stored by this call (cache default when None)
    pub ttl_ms: Option<u64>,
    /// Tags attached to values stored by this call
    pub tags: Vec<String>,
}

impl ResolveConfig {
    /// Creates a config for the given strategy with default TTL and no tags.
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Creates a config with a strategy and an explicit TTL.
    pub fn with_ttl(strategy: Strategy, ttl_ms: u64) -> Self {
        Self {
            strategy,
            ttl_ms: Some(ttl_ms),
            ..Self::default()
        }
    }

    /// Write-side settings for values stored by this resolve call.
    pub(crate) fn entry_config(&self) -> EntryConfig {
        EntryConfig {
            ttl_ms: self.ttl_ms,
            tags: self.tags.clone(),
            max_size_bytes: None,
            max_entries: None,
        }
    }
}
