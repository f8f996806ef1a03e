//! Core types for schema closure resolution.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Format string advertised for YANG sources by `ietf-netconf-monitoring`.
pub const YANG_FORMAT: &str = "yang";

/// One schema advertised by the device.
///
/// Mirrors an entry of the `ietf-netconf-monitoring` `schemas/schema` list.
/// Only `identifier` takes part in lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CatalogEntry {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub location: Vec<String>,
}

impl CatalogEntry {
    /// Entry carrying only an identifier.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            version: None,
            format: None,
            namespace: None,
            location: Vec::new(),
        }
    }

    /// Set the advertised revision.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the advertised format.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// True when the device advertises this entry as YANG source.
    ///
    /// Accepts both the bare `yang` and the module-qualified identity form.
    pub fn is_yang(&self) -> bool {
        match self.format.as_deref() {
            None => true,
            Some(format) => format.rsplit(':').next() == Some(YANG_FORMAT),
        }
    }
}

/// Outcome of one closure resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Identifier to schema text, in fetch order. Includes the root.
    pub fetched: IndexMap<String, String>,
    /// Whether anything beyond the root was queued for fetching.
    #[serde(rename = "changed")]
    pub resolved_beyond_root: bool,
    /// Number of schemas fetched, root included.
    #[serde(rename = "number_schema_fetched")]
    pub total_attempts: usize,
}

impl Resolution {
    /// Fetched identifiers in fetch order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.fetched.keys().map(String::as_str)
    }
}
