//! Package list query parameters

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cache::Discriminator;

/// Query parameters for the package list.
///
/// Every field is optional; absent fields are omitted from both the wire
/// form and the cache discriminator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageQuery {
    /// 1-based page number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    /// Free-text filter on package name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Filter on check status (e.g. "outdated")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl PackageQuery {
    /// Sets the page number.
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the page size.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Sets the name filter.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Sets the status filter.
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// Canonical JSON of the present fields, `{}` for an empty query.
///
/// Built from the `Serialize` form, so the key always matches what goes on
/// the wire. Object keys come out sorted.
impl Discriminator for PackageQuery {
    fn discriminator(&self) -> String {
        match serde_json::to_value(self) {
            Ok(value) => value.discriminator(),
            // Unreachable for optional scalars; keyed as the empty query
            Err(_) => Value::Object(Map::new()).discriminator(),
        }
    }
}
