//! Cache Module
//!
//! Provides the in-memory TTL store, its typed keys and statistics.

mod entry;
mod key;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::{CacheKey, Category, Discriminator, TtlTable};
pub use stats::CacheStats;
pub use store::{CacheStore, SharedStore};

// == Public Constants ==
/// TTL applied when neither the caller nor the TTL table supplies one
pub const DEFAULT_TTL: std::time::Duration = std::time::Duration::from_secs(5 * 60);

/// Interval between background sweeps
pub const DEFAULT_CLEANUP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);
