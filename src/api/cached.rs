//! Cached API
//!
//! One cached function per cacheable backend read, plus the invalidation
//! surface application code calls after writes.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use crate::api::{cached_call, Backend};
use crate::cache::{CacheKey, CacheStats, CacheStore, Category, SharedStore, TtlTable};
use crate::config::Config;
use crate::models::PackageQuery;
use crate::tasks::Sweeper;

/// Backend reads memoized through a shared TTL store.
///
/// When a sweeper is attached it lives exactly as long as the `CachedApi`:
/// dropping the API aborts it, and [`shutdown`](Self::shutdown) stops it
/// and waits for it.
pub struct CachedApi<B> {
    backend: B,
    store: SharedStore<Value>,
    ttls: TtlTable,
    sweeper: Option<Sweeper>,
}

impl<B: Backend> CachedApi<B> {
    /// Wraps `backend` with an existing store and TTL table.
    ///
    /// No sweeper is attached; the store is only cleaned lazily on read
    /// unless [`start_sweeper`](Self::start_sweeper) is called.
    pub fn new(backend: B, store: SharedStore<Value>, ttls: TtlTable) -> Self {
        Self {
            backend,
            store,
            ttls,
            sweeper: None,
        }
    }

    /// Creates a fresh store from the configuration and starts sweeping it
    /// every `config.cleanup_interval`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn from_config(backend: B, config: &Config) -> Self {
        let store = CacheStore::shared(config.default_ttl);
        let mut api = Self::new(backend, store, config.ttl_table.clone());
        api.start_sweeper(config.cleanup_interval);
        api
    }

    /// Starts the background sweeper on this API's store, replacing (and
    /// aborting) any sweeper already attached.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_sweeper(&mut self, interval: Duration) {
        self.sweeper = Some(Sweeper::spawn(self.store.clone(), interval));
    }

    /// Returns true while a sweeper task is attached and running.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .as_ref()
            .is_some_and(|sweeper| !sweeper.is_finished())
    }

    /// Stops the attached sweeper, if any, and waits for it to wind down.
    pub async fn shutdown(&mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.stop().await;
        }
    }

    /// The underlying store, for direct inspection.
    pub fn store(&self) -> &SharedStore<Value> {
        &self.store
    }

    /// The wrapped backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    // == Cached reads ==

    /// Package list for `query`.
    pub async fn packages(&self, query: &PackageQuery) -> Result<Value, B::Error> {
        let key = CacheKey::new(Category::Packages, query);
        self.call(key, || self.backend.packages(query)).await
    }

    /// Single package by id.
    pub async fn package_detail(&self, id: u64) -> Result<Value, B::Error> {
        let key = CacheKey::new(Category::PackageDetail, id);
        self.call(key, || self.backend.package_detail(id)).await
    }

    /// Upstream version info for a package.
    pub async fn package_upstream(&self, id: u64) -> Result<Value, B::Error> {
        let key = CacheKey::new(Category::PackageUpstream, id);
        self.call(key, || self.backend.package_upstream(id)).await
    }

    /// Backend system info (single cached entry).
    pub async fn system_info(&self) -> Result<Value, B::Error> {
        let key = CacheKey::singleton(Category::SystemInfo);
        self.call(key, || self.backend.system_info()).await
    }

    /// Backend configuration (single cached entry).
    pub async fn config(&self) -> Result<Value, B::Error> {
        let key = CacheKey::singleton(Category::Config);
        self.call(key, || self.backend.config()).await
    }

    async fn call<F, Fut>(&self, key: CacheKey, fetch: F) -> Result<Value, B::Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, B::Error>>,
    {
        let ttl = self.ttls.get(key.category());
        cached_call(&self.store, key, Some(ttl), fetch).await
    }

    // == Invalidation ==

    /// Drops every cached result.
    pub async fn clear_all(&self) {
        self.store.write().await.clear();
        info!("Cache cleared");
    }

    /// Drops every cached result of `category`. Returns how many were removed.
    pub async fn invalidate(&self, category: Category) -> usize {
        let removed = self.store.write().await.invalidate(category);
        info!(category = %category, removed, "Cache category invalidated");
        removed
    }

    /// Like [`invalidate`](Self::invalidate), but takes the category's name.
    ///
    /// Unknown names are logged and ignored rather than failing the caller.
    pub async fn clear_by_name(&self, name: &str) -> usize {
        match name.parse::<Category>() {
            Ok(category) => self.invalidate(category).await,
            Err(err) => {
                warn!("{}", err);
                0
            }
        }
    }

    /// Runs a write against the backend and, if it succeeds, invalidates
    /// `categories` so later reads refetch.
    ///
    /// A failed write invalidates nothing and its error is returned as-is.
    pub async fn mutate<T, E, Fut>(&self, categories: &[Category], write: Fut) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
    {
        let output = write.await?;
        for category in categories {
            self.invalidate(*category).await;
        }
        Ok(output)
    }

    /// Snapshot of the store's statistics.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }
}
