//! `metadata.json` entry types
//!
//! Field order here is the key order written to disk.

use serde::{Deserialize, Serialize};

/// Author of the last update to an icon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
}

/// Update provenance block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateInfo {
    /// ISO-8601 with milliseconds, `Z` suffix
    pub timestamp: String,
    pub author: Author,
}

/// Variant file stems (destination filename without extension)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantNames {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark: Option<String>,
}

impl VariantNames {
    pub fn is_empty(&self) -> bool {
        self.light.is_none() && self.dark.is_none()
    }

    /// `None` when neither side is set, so the key is left out entirely
    pub fn non_empty(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }
}

/// One icon's entry in the metadata store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// Base format (e.g. "svg")
    pub base: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub update: UpdateInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<VariantNames>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wordmark: Option<VariantNames>,
}
