//! Cache Key Module
//!
//! Typed two-part cache keys: a resource [`Category`] plus a discriminator
//! derived from the call parameters. Invalidation works on the category
//! directly, so similarly named categories can never shadow one another.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{self, CacheError};

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;

// == Category ==
/// Resource category a cached result belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Package list, keyed by query parameters
    Packages,
    /// Single package, keyed by id
    PackageDetail,
    /// Upstream version info for a package, keyed by id
    PackageUpstream,
    /// Backend system info (single entry)
    SystemInfo,
    /// Backend configuration (single entry)
    Config,
}

impl Category {
    /// Every registered category.
    pub const ALL: [Category; 5] = [
        Category::Packages,
        Category::PackageDetail,
        Category::PackageUpstream,
        Category::SystemInfo,
        Category::Config,
    ];

    /// Categories made stale by creating, updating or deleting a package.
    pub const PACKAGE_WRITES: [Category; 3] = [
        Category::Packages,
        Category::PackageDetail,
        Category::PackageUpstream,
    ];

    /// Namespace prefix used when rendering keys.
    pub fn prefix(&self) -> &'static str {
        match self {
            Category::Packages => "packages",
            Category::PackageDetail => "package_detail",
            Category::PackageUpstream => "package_upstream",
            Category::SystemInfo => "system_info",
            Category::Config => "config",
        }
    }

    /// Default time-to-live for results of this category.
    pub fn default_ttl(&self) -> Duration {
        let secs = match self {
            Category::Packages => 5 * MINUTE,
            Category::PackageDetail => 10 * MINUTE,
            Category::PackageUpstream => 30 * MINUTE,
            Category::SystemInfo => HOUR,
            Category::Config => 24 * HOUR,
        };
        Duration::from_secs(secs)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

impl FromStr for Category {
    type Err = CacheError;

    fn from_str(s: &str) -> error::Result<Self> {
        let name = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|category| category.prefix() == name)
            .ok_or_else(|| CacheError::UnknownCategory(s.to_string()))
    }
}

// == Discriminator ==
/// Maps call parameters to the string that tells one cached call apart
/// from another within the same category.
///
/// Implementations must be pure: equal parameters give equal strings.
pub trait Discriminator {
    /// Returns the discriminator string for these parameters.
    fn discriminator(&self) -> String;
}

/// Identity-less calls share a single entry.
impl Discriminator for () {
    fn discriminator(&self) -> String {
        String::new()
    }
}

impl Discriminator for u64 {
    fn discriminator(&self) -> String {
        self.to_string()
    }
}

impl Discriminator for i64 {
    fn discriminator(&self) -> String {
        self.to_string()
    }
}

impl Discriminator for str {
    fn discriminator(&self) -> String {
        self.to_string()
    }
}

impl Discriminator for String {
    fn discriminator(&self) -> String {
        self.clone()
    }
}

/// Compact JSON. Object keys come out sorted, so two parameter objects that
/// differ only in insertion order share a key.
impl Discriminator for Value {
    fn discriminator(&self) -> String {
        self.to_string()
    }
}

impl<T: Discriminator + ?Sized> Discriminator for &T {
    fn discriminator(&self) -> String {
        (**self).discriminator()
    }
}

// == Cache Key ==
/// Identifies one cached result: `(category, discriminator)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    category: Category,
    discriminator: String,
}

impl CacheKey {
    /// Builds a key from a category and the call's parameters.
    pub fn new(category: Category, params: impl Discriminator) -> Self {
        Self {
            category,
            discriminator: params.discriminator(),
        }
    }

    /// Key for a call without parameters.
    pub fn singleton(category: Category) -> Self {
        Self::new(category, ())
    }

    /// Resource category the key belongs to.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Parameter-derived part of the key; empty for singletons.
    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    pub(crate) fn into_parts(self) -> (Category, String) {
        (self.category, self.discriminator)
    }
}

/// Renders `<prefix>_<discriminator>`, or the bare prefix for singletons.
impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.discriminator.is_empty() {
            write!(f, "{}", self.category)
        } else {
            write!(f, "{}_{}", self.category, self.discriminator)
        }
    }
}

// == TTL Table ==
/// Per-category default TTLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtlTable {
    ttls: HashMap<Category, Duration>,
}

impl TtlTable {
    /// Returns the TTL configured for `category`.
    pub fn get(&self, category: Category) -> Duration {
        self.ttls
            .get(&category)
            .copied()
            .unwrap_or_else(|| category.default_ttl())
    }

    /// Overrides the TTL for one category.
    pub fn with(mut self, category: Category, ttl: Duration) -> Self {
        self.ttls.insert(category, ttl);
        self
    }
}

impl Default for TtlTable {
    fn default() -> Self {
        Self {
            ttls: Category::ALL
                .into_iter()
                .map(|category| (category, category.default_ttl()))
                .collect(),
        }
    }
}
