//! Sweep Tasks
//!
//! Background tasks that periodically remove expired cache entries and
//! enforce the capacity ceilings.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::EntryStore;

/// Spawns a background task that periodically removes expired entries.
///
/// The task runs in an infinite loop, sleeping for the given interval
/// between sweeps. Each sweep takes the store's write lock, so it is
/// serialized with foreground operations and never observes a partial
/// mutation.
///
/// # Arguments
/// * `store` - Shared reference to the entry store
/// * `interval` - Time between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
pub fn spawn_expiry_sweep<T>(
    store: Arc<RwLock<EntryStore<T>>>,
    interval: Duration,
) -> JoinHandle<()>
where
    T: Clone + Serialize + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!("Starting expiry sweep with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut store = store.write().await;
                store.remove_expired()
            };

            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}

/// Spawns a background task that periodically enforces the size and
/// entry-count ceilings via LRU eviction.
///
/// Inline enforcement after each write is the primary mechanism; this
/// sweep is the backstop for ceilings breached some other way, such as a
/// config carrying per-write overrides.
pub fn spawn_capacity_sweep<T>(
    store: Arc<RwLock<EntryStore<T>>>,
    interval: Duration,
) -> JoinHandle<()>
where
    T: Clone + Serialize + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!("Starting capacity sweep with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let evicted = {
                let mut store = store.write().await;
                store.enforce_capacity()
            };

            if evicted > 0 {
                info!("Capacity sweep: evicted {} entries", evicted);
            } else {
                debug!("Capacity sweep: all ceilings respected");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CacheConfig, EntryConfig};

    fn shared_store(config: CacheConfig) -> Arc<RwLock<EntryStore<String>>> {
        Arc::new(RwLock::new(EntryStore::new(config)))
    }

    #[tokio::test]
    async fn test_expiry_sweep_removes_expired_entries() {
        let store = shared_store(CacheConfig::default());

        {
            let mut store = store.write().await;
            store.set(
                "expire_soon".to_string(),
                "value".to_string(),
                &EntryConfig::with_ttl(20),
            );
            store.set(
                "long_lived".to_string(),
                "value".to_string(),
                &EntryConfig::with_ttl(60_000),
            );
        }

        let handle = spawn_expiry_sweep(Arc::clone(&store), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(120)).await;

        {
            let mut store = store.write().await;
            assert!(!store.has("expire_soon"), "expired entry should be swept");
            assert!(store.has("long_lived"), "live entry should survive");
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_capacity_sweep_enforces_ceilings() {
        let store = shared_store(CacheConfig {
            max_entries: 4,
            ..CacheConfig::default()
        });

        {
            let mut store = store.write().await;
            // Writes carrying a lenient per-write override can leave the
            // store above the cache-wide ceiling.
            let lenient = EntryConfig {
                max_entries: Some(100),
                ..EntryConfig::default()
            };
            for i in 0..6 {
                store.set(format!("key{}", i), "value".to_string(), &lenient);
            }
            assert_eq!(store.len(), 6);
        }

        let handle = spawn_capacity_sweep(Arc::clone(&store), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(120)).await;

        {
            let store = store.read().await;
            assert!(store.len() <= 4, "sweep should trim to the ceiling");
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_tasks_can_be_aborted() {
        let store = shared_store(CacheConfig::default());

        let expiry = spawn_expiry_sweep(Arc::clone(&store), Duration::from_millis(50));
        let capacity = spawn_capacity_sweep(store, Duration::from_millis(50));

        expiry.abort();
        capacity.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(expiry.is_finished(), "Task should be finished after abort");
        assert!(capacity.is_finished(), "Task should be finished after abort");
    }
}
