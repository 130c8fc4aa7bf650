//! Cache Store Module
//!
//! Main cache engine: TTL-keyed entries indexed by category, with lazy
//! eviction on read, an explicit sweep, and whole-category invalidation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::cache::{CacheEntry, CacheKey, CacheStats, Category};

/// A store shared between the cached-call wrapper, invalidation callers and
/// the sweeper. Guards are only held for single store operations.
pub type SharedStore<V> = Arc<RwLock<CacheStore<V>>>;

// == Cache Store ==
/// TTL store mapping cache keys to values.
///
/// Every operation is total. Entries whose expiry has passed are never
/// returned, whether or not they have been physically removed yet.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Entries grouped by category, then keyed by discriminator
    entries: HashMap<Category, HashMap<String, CacheEntry<V>>>,
    /// Performance statistics
    stats: CacheStats,
    /// TTL used when `set` is called without one
    default_ttl: Duration,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `default_ttl` - TTL applied to entries stored without an explicit one
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            default_ttl,
        }
    }

    /// Creates an empty store ready to be shared across tasks.
    pub fn shared(default_ttl: Duration) -> SharedStore<V> {
        Arc::new(RwLock::new(Self::new(default_ttl)))
    }

    /// TTL applied by `set` when no explicit TTL is given.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Set ==
    /// Stores a value, replacing any previous value and expiry for the key.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL (uses default_ttl if None)
    pub fn set(&mut self, key: CacheKey, value: V, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let (category, discriminator) = key.into_parts();

        self.entries
            .entry(category)
            .or_default()
            .insert(discriminator, CacheEntry::new(value, ttl));
    }

    // == Get ==
    /// Retrieves a live value by key.
    ///
    /// Returns None if the key is absent or expired. An expired entry is
    /// removed as a side effect.
    pub fn get(&mut self, key: &CacheKey) -> Option<V> {
        let now = Instant::now();

        let Some(bucket) = self.entries.get_mut(&key.category()) else {
            self.stats.record_miss();
            return None;
        };

        let expired = match bucket.get(key.discriminator()) {
            Some(entry) => entry.is_expired_at(now),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            bucket.remove(key.discriminator());
            self.stats.record_expired(1);
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        bucket.get(key.discriminator()).map(|entry| entry.value.clone())
    }

    // == Has ==
    /// Returns true if `get` would return a value, with the same eviction
    /// side effect.
    pub fn has(&mut self, key: &CacheKey) -> bool {
        self.get(key).is_some()
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether an entry was tracked.
    pub fn delete(&mut self, key: &CacheKey) -> bool {
        self.entries
            .get_mut(&key.category())
            .and_then(|bucket| bucket.remove(key.discriminator()))
            .is_some()
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Invalidate ==
    /// Removes every entry of `category`, leaving other categories untouched.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate(&mut self, category: Category) -> usize {
        let removed = self
            .entries
            .remove(&category)
            .map_or(0, |bucket| bucket.len());
        self.stats.record_invalidated(removed);
        removed
    }

    // == Keys ==
    /// Returns every tracked key.
    ///
    /// This includes entries that have expired but not been swept yet; use
    /// `has` to ask whether a key is live.
    pub fn keys(&self) -> Vec<CacheKey> {
        self.entries
            .iter()
            .flat_map(|(category, bucket)| {
                bucket
                    .keys()
                    .map(move |discriminator| CacheKey::new(*category, discriminator.as_str()))
            })
            .collect()
    }

    // == Length ==
    /// Returns the number of tracked entries, with the same caveat as `keys`.
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    // == Is Empty ==
    /// Returns true if no entries are tracked, expired or not.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        for bucket in self.entries.values_mut() {
            let before = bucket.len();
            bucket.retain(|_, entry| !entry.is_expired_at(now));
            removed += before - bucket.len();
        }
        self.entries.retain(|_, bucket| !bucket.is_empty());

        self.stats.record_expired(removed);
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.len());
        stats
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(300);

    fn key(category: Category, id: u64) -> CacheKey {
        CacheKey::new(category, id)
    }

    #[test]
    fn test_store_new() {
        let store: CacheStore<String> = CacheStore::new(TTL);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.default_ttl(), TTL);
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = CacheStore::new(TTL);

        store.set(key(Category::PackageDetail, 1), "value1".to_string(), None);

        assert_eq!(
            store.get(&key(Category::PackageDetail, 1)),
            Some("value1".to_string())
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store: CacheStore<String> = CacheStore::new(TTL);

        assert_eq!(store.get(&key(Category::PackageDetail, 1)), None);
        assert!(!store.has(&key(Category::PackageDetail, 1)));
    }

    #[test]
    fn test_store_delete() {
        let mut store = CacheStore::new(TTL);

        store.set(key(Category::PackageDetail, 1), 1, None);
        assert!(store.delete(&key(Category::PackageDetail, 1)));

        assert!(store.is_empty());
        assert_eq!(store.get(&key(Category::PackageDetail, 1)), None);
    }

    #[test]
    fn test_store_delete_nonexistent_is_noop() {
        let mut store = CacheStore::new(TTL);
        store.set(key(Category::PackageDetail, 1), 1, None);

        assert!(!store.delete(&key(Category::PackageDetail, 2)));
        assert!(!store.delete(&key(Category::Config, 1)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = CacheStore::new(TTL);

        store.set(key(Category::PackageDetail, 1), "value1", None);
        store.set(key(Category::PackageDetail, 1), "value2", None);

        assert_eq!(store.get(&key(Category::PackageDetail, 1)), Some("value2"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_overwrite_resets_lifetime_without_accumulating() {
        let mut store = CacheStore::new(TTL);
        let k = key(Category::PackageDetail, 1);

        store.set(k.clone(), 1, Some(Duration::from_secs(10)));
        tokio::time::advance(Duration::from_secs(8)).await;

        // Shorter TTL on re-set replaces, never extends, the old expiry
        store.set(k.clone(), 2, Some(Duration::from_secs(5)));
        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(store.get(&k), Some(2));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(store.get(&k), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_ttl_expiration() {
        let mut store = CacheStore::new(TTL);
        let k = key(Category::Packages, 1);

        store.set(k.clone(), "value1", Some(Duration::from_secs(1)));
        assert!(store.has(&k));

        tokio::time::advance(Duration::from_millis(1100)).await;

        // Still tracked until read or swept
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&k), None);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_store_zero_ttl_is_immediately_expired() {
        let mut store = CacheStore::new(TTL);
        let k = key(Category::Packages, 1);

        store.set(k.clone(), 1, Some(Duration::ZERO));
        assert_eq!(store.get(&k), None);
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_default_ttl_applies() {
        let mut store = CacheStore::new(Duration::from_secs(2));
        let k = key(Category::Packages, 1);

        store.set(k.clone(), 1, None);
        tokio::time::advance(Duration::from_millis(1900)).await;
        assert!(store.has(&k));

        tokio::time::advance(Duration::from_millis(100)).await;
        assert!(!store.has(&k));
    }

    #[test]
    fn test_store_clear() {
        let mut store = CacheStore::new(TTL);
        store.set(key(Category::Packages, 1), 1, None);
        store.set(key(Category::Config, 1), 2, None);

        store.clear();

        assert_eq!(store.len(), 0);
        assert_eq!(store.get(&key(Category::Packages, 1)), None);
        assert_eq!(store.get(&key(Category::Config, 1)), None);
    }

    #[test]
    fn test_store_invalidate_only_touches_category() {
        let mut store = CacheStore::new(TTL);
        store.set(key(Category::Packages, 1), 1, None);
        store.set(key(Category::Packages, 2), 2, None);
        store.set(key(Category::PackageDetail, 1), 3, None);
        store.set(CacheKey::singleton(Category::Config), 4, None);

        let removed = store.invalidate(Category::Packages);

        assert_eq!(removed, 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&key(Category::PackageDetail, 1)), Some(3));
        assert_eq!(store.get(&CacheKey::singleton(Category::Config)), Some(4));
        assert_eq!(store.invalidate(Category::Packages), 0);
    }

    #[test]
    fn test_store_keys() {
        let mut store = CacheStore::new(TTL);
        store.set(key(Category::PackageDetail, 7), 1, None);
        store.set(CacheKey::singleton(Category::SystemInfo), 2, None);

        let mut keys: Vec<String> = store.keys().iter().map(ToString::to_string).collect();
        keys.sort();

        assert_eq!(keys, vec!["package_detail_7", "system_info"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_keys_include_unswept_expired() {
        let mut store = CacheStore::new(TTL);
        store.set(key(Category::Packages, 1), 1, Some(Duration::from_secs(1)));

        tokio::time::advance(Duration::from_secs(2)).await;

        assert_eq!(store.keys().len(), 1);
        assert!(!store.has(&key(Category::Packages, 1)));
        assert!(store.keys().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_cleanup_expired() {
        let mut store = CacheStore::new(TTL);

        store.set(key(Category::Packages, 1), "value1", Some(Duration::from_secs(1)));
        store.set(key(Category::Packages, 2), "value2", Some(Duration::from_secs(10)));
        store.set(key(Category::Config, 1), "value3", Some(Duration::from_secs(1)));

        tokio::time::advance(Duration::from_millis(1100)).await;

        let removed = store.cleanup_expired();
        assert_eq!(removed, 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&key(Category::Packages, 2)), Some("value2"));
        assert_eq!(store.cleanup_expired(), 0);
    }

    #[test]
    fn test_store_stats() {
        let mut store = CacheStore::new(TTL);

        store.set(key(Category::Packages, 1), 1, None);
        store.set(key(Category::Config, 1), 1, Some(Duration::ZERO));
        store.get(&key(Category::Packages, 1)); // hit
        store.get(&key(Category::Packages, 2)); // miss
        store.get(&key(Category::Config, 1)); // expired miss
        store.invalidate(Category::Packages);

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.invalidated, 1);
        assert_eq!(stats.total_entries, 0);
    }

    #[tokio::test]
    async fn test_shared_store() {
        let store = CacheStore::shared(TTL);
        store.write().await.set(key(Category::Packages, 1), 1, None);

        assert_eq!(store.read().await.len(), 1);
        assert_eq!(store.write().await.get(&key(Category::Packages, 1)), Some(1));
    }
}
