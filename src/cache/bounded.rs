//! Bounded Cache Module
//!
//! Thread-safe cache handle: one mutex around the store, a background expiry
//! sweeper, and snapshot load/dump at the edges of its lifetime.

use std::path::PathBuf;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::{snapshot, CacheStats, CacheStore};
use crate::error::{CacheError, Result};
use crate::tasks::spawn_sweeper;

/// Default interval between expiry sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(30);

// == Cache Config ==
/// Construction parameters for a [`BoundedCache`].
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of live entries
    pub capacity: usize,
    /// Idle time after which an entry is swept
    pub ttl: Duration,
    /// Interval between expiry sweeps
    pub sweep_interval: Duration,
    /// Warm-start file; None disables persistence
    pub snapshot_path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            ttl: Duration::from_secs(3600),
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            snapshot_path: None,
        }
    }
}

// == Bounded Cache ==
/// Capacity-bounded LRU cache with idle-time expiry and snapshot warm start.
///
/// `get`, `set` and each sweep take the same exclusive lock: a read moves the
/// entry within the eviction index, so there is no shared read path.
#[derive(Debug)]
pub struct BoundedCache<V> {
    store: Arc<Mutex<CacheStore<V>>>,
    snapshot_path: Option<PathBuf>,
    sweeper: StdMutex<Option<JoinHandle<()>>>,
}

impl<V> BoundedCache<V>
where
    V: Clone + Serialize + DeserializeOwned + Send + 'static,
{
    // == Constructor ==
    /// Builds the cache, loads the snapshot if one is configured, and starts
    /// the expiry sweeper.
    ///
    /// The sweeper stops once `shutdown` turns `true` or its sender is dropped.
    /// Must be called from within a Tokio runtime.
    pub async fn new<F>(
        config: &CacheConfig,
        key_fn: F,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self>
    where
        F: Fn(&V) -> String + Send + Sync + 'static,
    {
        if config.sweep_interval.is_zero() {
            return Err(CacheError::Config(
                "sweep interval must be greater than zero".to_string(),
            ));
        }

        let mut store = CacheStore::new(config.capacity, config.ttl, Arc::new(key_fn))?;

        if let Some(path) = &config.snapshot_path {
            if let Some(values) = snapshot::load::<V>(path).await {
                let total = values.len();
                for value in values {
                    store.set(value)?;
                }
                info!(
                    path = %path.display(),
                    loaded = total,
                    retained = store.len(),
                    "Cache warmed from snapshot"
                );
            }
        }

        let store = Arc::new(Mutex::new(store));
        let sweeper = spawn_sweeper(store.clone(), config.sweep_interval, shutdown);

        Ok(Self {
            store,
            snapshot_path: config.snapshot_path.clone(),
            sweeper: StdMutex::new(Some(sweeper)),
        })
    }

    // == Get ==
    /// Returns a copy of the value for `key`, refreshing its recency.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.store.lock().await.get(key)
    }

    // == Set ==
    /// Stores `value` under its extracted key, evicting the least recently
    /// used entry if a new key arrives at capacity.
    pub async fn set(&self, value: V) -> Result<()> {
        self.store.lock().await.set(value)
    }

    // == Close ==
    /// Dumps every live value to the snapshot file, replacing its contents.
    ///
    /// In-memory state is left untouched. Fails with
    /// [`CacheError::SnapshotNotConfigured`] when persistence is disabled.
    pub async fn close(&self) -> Result<()> {
        let path = self
            .snapshot_path
            .as_deref()
            .ok_or(CacheError::SnapshotNotConfigured)?;

        let store = self.store.lock().await;
        let bytes = snapshot::encode(store.values())?;
        snapshot::write(path, &bytes).await?;

        info!(path = %path.display(), entries = store.len(), "Cache snapshot written");
        Ok(())
    }
}

impl<V> BoundedCache<V> {
    // == Join Sweeper ==
    /// Waits for the sweeper task to finish after shutdown was signalled.
    pub async fn join_sweeper(&self) {
        let handle = self
            .sweeper
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                warn!(error = %err, "Expiry sweeper ended abnormally");
            }
        }
    }

    /// Returns true while the sweeper task is still running.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    // == Stats ==
    pub async fn stats(&self) -> CacheStats {
        self.store.lock().await.stats()
    }

    // == Length ==
    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.lock().await.is_empty()
    }

    /// Checks for a key without refreshing its recency.
    pub async fn contains_key(&self, key: &str) -> bool {
        self.store.lock().await.contains_key(key)
    }

    pub async fn capacity(&self) -> usize {
        self.store.lock().await.capacity()
    }

    /// See [`CacheStore::is_consistent`].
    pub async fn is_consistent(&self) -> bool {
        self.store.lock().await.is_consistent()
    }
}

impl<V> Drop for BoundedCache<V> {
    fn drop(&mut self) {
        let handle = self
            .sweeper
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }
}
