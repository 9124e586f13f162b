//! Response Cache - a client-side in-memory response cache
//!
//! Stores the results of keyed fetch operations with TTL expiration and
//! LRU eviction, and decides per call whether to serve the stored result
//! or issue a fresh fetch.

pub mod cache;
pub mod config;
pub mod error;
pub mod service;
pub mod strategy;
pub mod tasks;

pub use cache::{CacheEntry, CacheStats, EntryStore, StatsSnapshot};
pub use config::{CacheConfig, EntryConfig};
pub use error::{BoxError, CacheError, Result};
pub use service::{ResponseCache, SweeperHandles};
pub use strategy::{ResolveConfig, Strategy};
pub use tasks::{spawn_capacity_sweep, spawn_expiry_sweep};
