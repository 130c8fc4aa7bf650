//! API Module
//!
//! Cached access to the backend's read endpoints and the invalidation
//! surface used after writes.
//!
//! # Cached reads
//! - package list (`packages`, 5 min)
//! - package detail (`package_detail`, 10 min)
//! - package upstream info (`package_upstream`, 30 min)
//! - system info (`system_info`, 60 min)
//! - config (`config`, 24 h)

pub mod backend;
pub mod cached;
pub mod call;

pub use backend::Backend;
pub use cached::CachedApi;
pub use call::cached_call;
