//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::{Category, TtlTable, DEFAULT_CLEANUP_INTERVAL, DEFAULT_TTL};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// TTL for entries stored without an explicit one
    pub default_ttl: Duration,
    /// Interval between background sweeps
    pub cleanup_interval: Duration,
    /// Per-category TTLs used by the cached calls
    pub ttl_table: TtlTable,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// Unset, unparsable or zero values fall back to the defaults.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `TTL_PACKAGES`, `TTL_PACKAGE_DETAIL`, `TTL_PACKAGE_UPSTREAM`,
    ///   `TTL_SYSTEM_INFO`, `TTL_CONFIG` - Per-category TTL in seconds
    pub fn from_env() -> Self {
        let ttl_table = Category::ALL
            .into_iter()
            .fold(TtlTable::default(), |table, category| {
                match env_secs(&ttl_var(category)) {
                    Some(ttl) => table.with(category, ttl),
                    None => table,
                }
            });

        Self {
            default_ttl: env_secs("DEFAULT_TTL").unwrap_or(DEFAULT_TTL),
            cleanup_interval: env_secs("CLEANUP_INTERVAL").unwrap_or(DEFAULT_CLEANUP_INTERVAL),
            ttl_table,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            ttl_table: TtlTable::default(),
        }
    }
}

/// Name of the variable overriding a category's TTL, e.g. `TTL_PACKAGE_DETAIL`.
fn ttl_var(category: Category) -> String {
    format!("TTL_{}", category.prefix().to_uppercase())
}

fn env_secs(name: &str) -> Option<Duration> {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}
