//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::debug;

use crate::cache::DEFAULT_SIZE_ESTIMATE;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub data: T,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Time-to-live in milliseconds
    pub ttl_ms: u64,
    /// Number of successful reads of this entry
    pub access_count: u64,
    /// Timestamp of the most recent successful read (Unix milliseconds)
    pub last_accessed_at: u64,
    /// Estimated serialized size in bytes, computed at write time
    pub size_bytes: usize,
    /// Labels used for group invalidation
    pub tags: HashSet<String>,
    /// Insertion counter assigned by the store; breaks LRU timestamp ties
    pub sequence: u64,
}

impl<T: Serialize> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new cache entry.
    ///
    /// The size estimate is computed here so a replaced entry's accounting
    /// can be adjusted in one place by the store.
    ///
    /// # Arguments
    /// * `data` - The value to store
    /// * `ttl_ms` - TTL in milliseconds
    /// * `tags` - Invalidation tags
    /// * `sequence` - Store-assigned insertion counter
    pub fn new(data: T, ttl_ms: u64, tags: HashSet<String>, sequence: u64) -> Self {
        let now = current_timestamp_ms();
        let size_bytes = estimate_size(&data);

        Self {
            data,
            created_at: now,
            ttl_ms,
            access_count: 0,
            last_accessed_at: now,
            size_bytes,
            tags,
            sequence,
        }
    }
}

impl<T> CacheEntry<T> {
    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once strictly more than `ttl_ms` milliseconds
    /// have elapsed since creation; at exactly `ttl_ms` it is still live.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms().saturating_sub(self.created_at) > self.ttl_ms
    }

    // == Touch ==
    /// Marks a successful read: bumps the access counter and refreshes the
    /// timestamp that drives LRU ordering.
    pub fn touch(&mut self) {
        self.access_count += 1;
        self.last_accessed_at = current_timestamp_ms();
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

/// Estimates the serialized size of a value in bytes.
///
/// A value that fails to serialize falls back to a fixed estimate rather
/// than failing the write.
pub fn estimate_size<T: Serialize>(value: &T) -> usize {
    match serde_json::to_vec(value) {
        Ok(bytes) => bytes.len(),
        Err(err) => {
            debug!("size estimate failed, using default: {}", err);
            DEFAULT_SIZE_ESTIMATE
        }
    }
}
