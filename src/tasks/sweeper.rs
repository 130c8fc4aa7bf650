//! TTL Sweeper Task
//!
//! Background task that periodically removes expired cache entries, so keys
//! that are written once and never read again do not linger.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedStore;

/// Shortest interval a sweeper will run at; shorter requests are raised to it.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Handle to a running sweep task.
///
/// The task is aborted when the handle is stopped or dropped, so it never
/// outlives the component that owns the store.
#[derive(Debug)]
pub struct Sweeper {
    handle: Option<JoinHandle<()>>,
}

impl Sweeper {
    /// Spawns a task that calls `cleanup_expired` on `store` every `interval`.
    ///
    /// The store lock is taken only for the duration of a single sweep.
    /// Intervals below [`MIN_SWEEP_INTERVAL`] (including zero) are clamped up
    /// to it.
    ///
    /// # Example
    /// ```ignore
    /// let store = CacheStore::<Value>::shared(DEFAULT_TTL);
    /// let sweeper = Sweeper::spawn(store.clone(), Duration::from_secs(60));
    /// // Later, during shutdown:
    /// sweeper.stop().await;
    /// ```
    pub fn spawn<V>(store: SharedStore<V>, interval: Duration) -> Self
    where
        V: Clone + Send + Sync + 'static,
    {
        let interval = interval.max(MIN_SWEEP_INTERVAL);
        let handle = tokio::spawn(async move {
            info!(
                "Starting TTL sweeper with interval of {} seconds",
                interval.as_secs_f64()
            );

            loop {
                tokio::time::sleep(interval).await;

                let removed = store.write().await.cleanup_expired();

                if removed > 0 {
                    info!("TTL sweep: removed {} expired entries", removed);
                } else {
                    debug!("TTL sweep: no expired entries found");
                }
            }
        });

        Self {
            handle: Some(handle),
        }
    }

    /// Returns true once the task has stopped running.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Aborts the task and waits for it to wind down.
    pub async fn stop(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            // Cancellation is the expected outcome here
            let _ = handle.await;
            info!("TTL sweeper stopped");
        }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheKey, CacheStore, Category};

    const INTERVAL: Duration = Duration::from_secs(60);

    fn key(id: u64) -> CacheKey {
        CacheKey::new(Category::PackageDetail, id)
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_removes_expired_entries() {
        let store = CacheStore::shared(Duration::from_secs(300));
        store
            .write()
            .await
            .set(key(1), "value", Some(Duration::from_secs(1)));

        let sweeper = Sweeper::spawn(store.clone(), INTERVAL);

        tokio::time::sleep(INTERVAL + Duration::from_secs(1)).await;

        // Removed without any read touching the key
        assert_eq!(store.read().await.len(), 0);
        assert_eq!(store.read().await.stats().expired, 1);

        sweeper.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_preserves_valid_entries() {
        let store = CacheStore::shared(Duration::from_secs(300));
        store
            .write()
            .await
            .set(key(1), "value", Some(Duration::from_secs(3600)));

        let sweeper = Sweeper::spawn(store.clone(), INTERVAL);

        tokio::time::sleep(INTERVAL * 3).await;

        assert_eq!(store.write().await.get(&key(1)), Some("value"));

        sweeper.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_stop_halts_sweeps() {
        let store = CacheStore::shared(Duration::from_secs(300));
        let sweeper = Sweeper::spawn(store.clone(), INTERVAL);

        sweeper.stop().await;

        store
            .write()
            .await
            .set(key(1), "value", Some(Duration::from_secs(1)));
        tokio::time::sleep(INTERVAL * 2).await;

        // Expired but still tracked: nothing swept it
        assert_eq!(store.read().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_clamped() {
        let store = CacheStore::shared(Duration::from_secs(300));
        store.write().await.set(key(1), "value", Some(Duration::ZERO));

        let sweeper = Sweeper::spawn(store.clone(), Duration::ZERO);

        // No sweep before the minimum interval has elapsed
        tokio::time::sleep(MIN_SWEEP_INTERVAL / 2).await;
        assert_eq!(store.read().await.len(), 1);

        tokio::time::sleep(MIN_SWEEP_INTERVAL).await;
        assert_eq!(store.read().await.len(), 0);
        assert!(!sweeper.is_finished());

        sweeper.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_aborted_on_drop() {
        let store: SharedStore<&str> = CacheStore::shared(Duration::from_secs(300));
        let sweeper = Sweeper::spawn(store.clone(), INTERVAL);
        assert!(!sweeper.is_finished());

        drop(sweeper);

        store
            .write()
            .await
            .set(key(1), "value", Some(Duration::from_secs(1)));
        tokio::time::sleep(INTERVAL * 2).await;

        assert_eq!(store.read().await.len(), 1);
    }
}
