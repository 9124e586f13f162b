//! Entry Store Module
//!
//! Main cache engine combining HashMap storage with TTL expiration,
//! size accounting, and LRU eviction.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use regex::Regex;
use serde::Serialize;

use crate::cache::entry::CacheEntry;
use crate::cache::stats::{format_timestamp_ms, CacheStats, StatsSnapshot};
use crate::config::{CacheConfig, EntryConfig};
use crate::error::Result;

// == Entry Store ==
/// Keyed storage of cache entries with TTL expiry and LRU eviction.
///
/// The store itself is synchronous and single-owner; concurrent callers
/// go through `ResponseCache`, which serializes mutations behind a lock.
#[derive(Debug)]
pub struct EntryStore<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Running total of per-entry size estimates
    total_size_bytes: usize,
    /// Monotonic insertion counter; breaks LRU timestamp ties
    next_sequence: u64,
    /// Performance statistics
    stats: CacheStats,
    /// Cache-wide ceilings and defaults
    config: CacheConfig,
}

impl<T: Clone + Serialize> EntryStore<T> {
    // == Constructor ==
    /// Creates a new EntryStore with the given cache-wide configuration.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            total_size_bytes: 0,
            next_sequence: 0,
            stats: CacheStats::new(),
            config,
        }
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns a clone of the value if present and not expired; a hit also
    /// bumps the entry's access count and LRU timestamp. An entry observed
    /// expired is removed and counted as a miss.
    pub fn get(&mut self, key: &str) -> Option<T> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.entries.get_mut(key).map(|entry| {
            entry.touch();
            entry.data.clone()
        })
    }

    // == Set ==
    /// Stores a value under a key, replacing any prior entry.
    ///
    /// The write itself cannot fail: a value whose size cannot be estimated
    /// is stored under a fixed default estimate. If the write pushes the
    /// store over a ceiling, both sweeps run inline before returning.
    pub fn set(&mut self, key: String, value: T, config: &EntryConfig) {
        let ttl_ms = config.ttl_ms.unwrap_or(self.config.default_ttl_ms);
        let tags: HashSet<String> = config.tags.iter().cloned().collect();
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let entry = CacheEntry::new(value, ttl_ms, tags, sequence);
        self.total_size_bytes += entry.size_bytes;
        if let Some(previous) = self.entries.insert(key, entry) {
            self.total_size_bytes = self.total_size_bytes.saturating_sub(previous.size_bytes);
        }

        // Inline enforcement keeps the periodic sweeps a backstop rather
        // than the only place ceilings are applied.
        let max_entries = config.max_entries.unwrap_or(self.config.max_entries);
        let max_size_bytes = config.max_size_bytes.unwrap_or(self.config.max_size_bytes);
        if self.entries.len() > max_entries || self.total_size_bytes > max_size_bytes {
            self.remove_expired();
            self.enforce_ceilings(max_entries, max_size_bytes);
        }
    }

    // == Delete ==
    /// Removes an entry by key; returns whether a removal occurred.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key).is_some()
    }

    // == Has ==
    /// Returns true iff the key holds a live entry.
    ///
    /// Uses the same expiry test as `get` and removes an entry observed
    /// expired, but mutates no access metadata and no hit/miss counters.
    pub fn has(&mut self, key: &str) -> bool {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => return false,
        };

        if expired {
            self.remove_entry(key);
            return false;
        }

        true
    }

    // == Clear ==
    /// Removes all entries and resets the hit/miss/eviction counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.total_size_bytes = 0;
        self.stats.reset();
    }

    // == Remove Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed. Expiry removals are not
    /// counted as evictions.
    pub fn remove_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.remove_entry(&key);
        }

        count
    }

    // == Enforce Capacity ==
    /// Applies the cache-wide ceilings, evicting least-recently-accessed
    /// entries first. Returns the number of entries evicted.
    pub fn enforce_capacity(&mut self) -> usize {
        let max_entries = self.config.max_entries;
        let max_size_bytes = self.config.max_size_bytes;
        self.enforce_ceilings(max_entries, max_size_bytes)
    }

    /// Applies explicit ceilings.
    ///
    /// A breached ceiling is enforced down to 80% of its limit so a sweep
    /// landing exactly on the limit does not immediately re-trigger.
    fn enforce_ceilings(&mut self, max_entries: usize, max_size_bytes: usize) -> usize {
        let mut evicted = 0;

        if self.total_size_bytes > max_size_bytes {
            let target = max_size_bytes * 4 / 5;
            while self.total_size_bytes > target {
                match self.lru_victim() {
                    Some(key) => {
                        self.remove_entry(&key);
                        self.stats.record_eviction();
                        evicted += 1;
                    }
                    None => break,
                }
            }
        }

        if self.entries.len() > max_entries {
            let target = max_entries * 4 / 5;
            while self.entries.len() > target {
                match self.lru_victim() {
                    Some(key) => {
                        self.remove_entry(&key);
                        self.stats.record_eviction();
                        evicted += 1;
                    }
                    None => break,
                }
            }
        }

        evicted
    }

    /// Selects the next eviction victim: oldest last access, ties broken
    /// by insertion order.
    fn lru_victim(&self) -> Option<String> {
        self.entries
            .iter()
            .min_by_key(|(_, entry)| (entry.last_accessed_at, entry.sequence))
            .map(|(key, _)| key.clone())
    }

    // == Invalidation ==
    /// Removes every entry whose tag set intersects the given tags.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_by_tags<S: AsRef<str>>(&mut self, tags: &[S]) -> usize {
        let matched: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| tags.iter().any(|tag| entry.tags.contains(tag.as_ref())))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &matched {
            self.remove_entry(key);
        }

        matched.len()
    }

    /// Removes every entry whose key matches the given regex pattern.
    ///
    /// Returns the number of entries removed, or an error for an invalid
    /// pattern.
    pub fn invalidate_by_pattern(&mut self, pattern: &str) -> Result<usize> {
        let re = Regex::new(pattern)?;

        let matched: Vec<String> = self
            .entries
            .keys()
            .filter(|key| re.is_match(key))
            .cloned()
            .collect();

        for key in &matched {
            self.remove_entry(key);
        }

        Ok(matched.len())
    }

    // == Stats ==
    /// Returns a point-in-time snapshot of counters and entry aggregates.
    pub fn snapshot(&self) -> StatsSnapshot {
        let oldest = self.entries.values().map(|e| e.created_at).min();
        let newest = self.entries.values().map(|e| e.created_at).max();
        let avg_access_count = if self.entries.is_empty() {
            0.0
        } else {
            let total: u64 = self.entries.values().map(|e| e.access_count).sum();
            total as f64 / self.entries.len() as f64
        };

        StatsSnapshot {
            entries: self.entries.len(),
            memory_usage_bytes: self.total_size_bytes,
            hits: self.stats.hits,
            misses: self.stats.misses,
            evictions: self.stats.evictions,
            hit_rate: self.stats.hit_rate(),
            oldest_entry_at: oldest.and_then(format_timestamp_ms),
            newest_entry_at: newest.and_then(format_timestamp_ms),
            avg_access_count,
            taken_at: Utc::now().to_rfc3339(),
        }
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the running total of per-entry size estimates.
    pub fn total_size_bytes(&self) -> usize {
        self.total_size_bytes
    }

    /// Removes an entry and keeps the size accounting consistent.
    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<T>> {
        let removed = self.entries.remove(key);
        if let Some(entry) = &removed {
            self.total_size_bytes = self.total_size_bytes.saturating_sub(entry.size_bytes);
        }
        removed
    }
}
