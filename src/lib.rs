//! Upstream Cache - client-side caching for a package/upstream tracker
//!
//! Memoizes backend reads in a TTL store, sweeps expired entries in the
//! background, and invalidates whole resource categories after writes.

#![warn(missing_docs)]

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::{cached_call, Backend, CachedApi};
pub use cache::{CacheKey, CacheStore, Category, SharedStore};
pub use config::Config;
pub use error::CacheError;
pub use models::PackageQuery;
pub use tasks::Sweeper;
