//! Error types for the caching layer
//!
//! Provides unified error handling using thiserror.
//!
//! The store itself is total: a lookup on a missing key is a miss, not an
//! error. Fetch failures belong to the backend and are passed through as-is,
//! so they never appear here.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the caching layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Category name does not match any registered resource
    #[error("Unknown cache category: {0}")]
    UnknownCategory(String),
}

// == Result Type Alias ==
/// Convenience Result type for the caching layer.
pub type Result<T> = std::result::Result<T, CacheError>;
