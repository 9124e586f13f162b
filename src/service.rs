//! Response Cache Service
//!
//! Public entry point owning the entry store, counters, and sweep tasks.
//! All store mutations are serialized behind a single RwLock; the lock is
//! never held across a fetch await.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::cache::{EntryStore, StatsSnapshot};
use crate::config::{CacheConfig, EntryConfig};
use crate::error::{BoxError, CacheError, Result};
use crate::strategy::{ResolveConfig, Strategy};
use crate::tasks::{spawn_capacity_sweep, spawn_expiry_sweep};

// == Response Cache ==
/// Client-side response cache with TTL expiry, LRU eviction, and per-call
/// fetch strategies.
///
/// Cloning is cheap and shares the underlying store, so one instance can
/// be handed to every collaborator that fetches a given class of resource.
#[derive(Debug, Clone)]
pub struct ResponseCache<T> {
    /// Thread-safe entry store
    store: Arc<RwLock<EntryStore<T>>>,
    config: CacheConfig,
}

impl<T> ResponseCache<T>
where
    T: Clone + Serialize + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a new cache with the given configuration.
    ///
    /// The periodic sweeps are not started here; call [`spawn_sweepers`]
    /// once a runtime is available.
    ///
    /// [`spawn_sweepers`]: ResponseCache::spawn_sweepers
    pub fn new(config: CacheConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(EntryStore::new(config.clone()))),
            config,
        }
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Takes the write lock: a hit updates LRU metadata and the counters.
    pub async fn get(&self, key: &str) -> Option<T> {
        self.store.write().await.get(key)
    }

    // == Set ==
    /// Stores a value under a key, replacing any prior entry.
    pub async fn set(&self, key: impl Into<String>, value: T, config: EntryConfig) {
        self.store.write().await.set(key.into(), value, &config);
    }

    // == Delete ==
    /// Removes an entry by key; returns whether a removal occurred.
    pub async fn delete(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    // == Has ==
    /// Returns true iff the key holds a live entry, without counting a hit
    /// or a miss.
    pub async fn has(&self, key: &str) -> bool {
        self.store.write().await.has(key)
    }

    // == Clear ==
    /// Removes all entries and resets the counters.
    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    /// Returns the current number of entries.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Returns true if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    // == Resolve ==
    /// Produces a value for a key through the configured strategy, calling
    /// the fetch function when the strategy requires fresh data.
    ///
    /// # Arguments
    /// * `key` - Cache key for the resource
    /// * `fetch` - Zero-argument async operation producing a fresh value
    /// * `config` - Strategy plus write-side TTL and tags
    pub async fn resolve<F, Fut>(&self, key: &str, fetch: F, config: ResolveConfig) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, BoxError>> + Send + 'static,
    {
        match config.strategy {
            Strategy::CacheFirst => self.resolve_cache_first(key, fetch, &config).await,
            Strategy::NetworkFirst => self.resolve_network_first(key, fetch, &config).await,
            Strategy::StaleWhileRevalidate => {
                self.resolve_stale_while_revalidate(key, fetch, &config).await
            }
            Strategy::NetworkOnly => fetch().await.map_err(CacheError::Fetch),
            Strategy::CacheOnly => self
                .get(key)
                .await
                .ok_or_else(|| CacheError::NotCached(key.to_string())),
        }
    }

    /// Serves a stored value when present; fetches, stores, and returns
    /// otherwise. A fetch failure propagates to the caller.
    async fn resolve_cache_first<F, Fut>(
        &self,
        key: &str,
        fetch: F,
        config: &ResolveConfig,
    ) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, BoxError>>,
    {
        if let Some(value) = self.get(key).await {
            return Ok(value);
        }

        // Concurrent cold resolves for the same key may each issue a fetch;
        // last write wins.
        let fresh = fetch().await.map_err(CacheError::Fetch)?;
        self.set(key, fresh.clone(), config.entry_config()).await;
        Ok(fresh)
    }

    /// Fetches first; a success is stored and returned. On failure a live
    /// stored entry is served instead, and only when none exists does the
    /// failure reach the caller.
    async fn resolve_network_first<F, Fut>(
        &self,
        key: &str,
        fetch: F,
        config: &ResolveConfig,
    ) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, BoxError>>,
    {
        match fetch().await {
            Ok(fresh) => {
                self.set(key, fresh.clone(), config.entry_config()).await;
                Ok(fresh)
            }
            Err(err) => match self.get(key).await {
                Some(fallback) => {
                    warn!(
                        "network-first fetch for '{}' failed, serving cached value: {}",
                        key, err
                    );
                    Ok(fallback)
                }
                None => Err(CacheError::Fetch(err)),
            },
        }
    }

    /// Serves a stored value immediately and refreshes it in a detached
    /// task; a cold key degrades to cache-first.
    async fn resolve_stale_while_revalidate<F, Fut>(
        &self,
        key: &str,
        fetch: F,
        config: &ResolveConfig,
    ) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, BoxError>> + Send + 'static,
    {
        let Some(value) = self.get(key).await else {
            let fresh = fetch().await.map_err(CacheError::Fetch)?;
            self.set(key, fresh.clone(), config.entry_config()).await;
            return Ok(fresh);
        };

        // The refresh failure is terminal for this attempt only: it must
        // never surface in a caller context or disturb the stored entry.
        let store = Arc::clone(&self.store);
        let key = key.to_string();
        let entry_config = config.entry_config();
        let refresh = fetch();
        tokio::spawn(async move {
            match refresh.await {
                Ok(fresh) => {
                    store.write().await.set(key, fresh, &entry_config);
                }
                Err(err) => {
                    warn!("background revalidation for '{}' failed: {}", key, err);
                }
            }
        });

        Ok(value)
    }

    // == Invalidation ==
    /// Removes every entry whose tag set intersects the given tags;
    /// returns the number removed.
    pub async fn invalidate_by_tags<S: AsRef<str>>(&self, tags: &[S]) -> usize {
        self.store.write().await.invalidate_by_tags(tags)
    }

    /// Removes every entry whose key matches the given regex pattern;
    /// returns the number removed.
    pub async fn invalidate_by_pattern(&self, pattern: &str) -> Result<usize> {
        self.store.write().await.invalidate_by_pattern(pattern)
    }

    // == Stats ==
    /// Returns a point-in-time snapshot of counters and entry aggregates.
    pub async fn stats(&self) -> StatsSnapshot {
        self.store.read().await.snapshot()
    }

    // == Sweepers ==
    /// Starts the periodic expiry and capacity sweeps.
    ///
    /// The sweeps acquire the same write lock as foreground operations and
    /// never block callers beyond that. Abort the returned handles during
    /// shutdown.
    pub fn spawn_sweepers(&self) -> SweeperHandles {
        SweeperHandles {
            expiry: spawn_expiry_sweep(Arc::clone(&self.store), self.config.expiry_sweep_interval),
            capacity: spawn_capacity_sweep(
                Arc::clone(&self.store),
                self.config.capacity_sweep_interval,
            ),
        }
    }
}

impl<T> Default for ResponseCache<T>
where
    T: Clone + Serialize + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

// == Sweeper Handles ==
/// Handles for the two background sweep tasks.
#[derive(Debug)]
pub struct SweeperHandles {
    /// Periodic expired-entry removal
    pub expiry: JoinHandle<()>,
    /// Periodic ceiling enforcement
    pub capacity: JoinHandle<()>,
}

impl SweeperHandles {
    /// Aborts both sweep tasks.
    pub fn abort(&self) {
        self.expiry.abort();
        self.capacity.abort();
    }
}
