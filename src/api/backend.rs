//! Backend Interface
//!
//! The transport that actually talks to the server. The cache only needs
//! already-decoded payloads or a failure, so the HTTP details stay with the
//! implementor.

use async_trait::async_trait;
use serde_json::Value;

use crate::models::PackageQuery;

/// Remote read operations that can be served through the cache.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Failure type of the transport. Passed through the cache unchanged.
    type Error: Send;

    /// Fetches one page of the package list.
    async fn packages(&self, query: &PackageQuery) -> Result<Value, Self::Error>;

    /// Fetches a single package by id.
    async fn package_detail(&self, id: u64) -> Result<Value, Self::Error>;

    /// Fetches upstream version info for a package.
    async fn package_upstream(&self, id: u64) -> Result<Value, Self::Error>;

    /// Fetches backend system info.
    async fn system_info(&self) -> Result<Value, Self::Error>;

    /// Fetches backend configuration.
    async fn config(&self) -> Result<Value, Self::Error>;
}
