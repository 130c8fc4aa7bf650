//! Request parameter models for cached calls
//!
//! Parameter objects double as cache discriminators, so each one defines a
//! canonical serialization.

pub mod query;

// Re-export commonly used types
pub use query::PackageQuery;
