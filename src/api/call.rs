//! Cached-Call Wrapper
//!
//! Memoizes an asynchronous fetch against the shared store.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheKey, SharedStore};

/// Returns the live cached value for `key`, or awaits `fetch` and caches
/// its successful result for `ttl` (store default if None).
///
/// The store lock is released while `fetch` runs. Failures are returned
/// exactly as `fetch` produced them and are never cached or retried.
///
/// Concurrent misses on the same key are not coalesced: each caller runs
/// its own `fetch`, and the last one to finish is what stays cached.
/// Dropping the returned future mid-fetch leaves the store untouched.
pub async fn cached_call<V, E, F, Fut>(
    store: &SharedStore<V>,
    key: CacheKey,
    ttl: Option<Duration>,
    fetch: F,
) -> Result<V, E>
where
    V: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V, E>>,
{
    let cached = store.write().await.get(&key);
    if let Some(value) = cached {
        debug!(key = %key, "cache hit");
        return Ok(value);
    }

    debug!(key = %key, "cache miss, fetching");
    let value = fetch().await?;

    store.write().await.set(key, value.clone(), ttl);
    Ok(value)
}
