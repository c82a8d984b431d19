//! Variant roles and the per-run target list

use serde::Serialize;
use std::fmt;

/// Semantic role an asset plays for an icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariantKey {
    Base,
    Light,
    Dark,
    WordmarkLight,
    WordmarkDark,
}

impl VariantKey {
    /// Planner order; earlier keys get first claim on ambiguous assets
    pub const ALL: [VariantKey; 5] = [
        VariantKey::Base,
        VariantKey::Light,
        VariantKey::Dark,
        VariantKey::WordmarkLight,
        VariantKey::WordmarkDark,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantKey::Base => "base",
            VariantKey::Light => "light",
            VariantKey::Dark => "dark",
            VariantKey::WordmarkLight => "wordmark-light",
            VariantKey::WordmarkDark => "wordmark-dark",
        }
    }

    /// Filename suffix appended to the icon name (`None` for the base icon)
    pub fn suffix(&self) -> Option<&'static str> {
        match self {
            VariantKey::Base => None,
            other => Some(other.as_str()),
        }
    }

    /// Lower-case tokens a source filename must all contain to match strictly
    pub fn matchers(&self) -> &'static [&'static str] {
        match self {
            VariantKey::Base => &[],
            VariantKey::Light => &["light"],
            VariantKey::Dark => &["dark"],
            VariantKey::WordmarkLight => &["wordmark", "light"],
            VariantKey::WordmarkDark => &["wordmark", "dark"],
        }
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One planned output file and the asset chosen for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantTarget {
    pub key: VariantKey,
    /// `{name}[-{suffix}].{ext}`
    pub dest_filename: String,
    pub matchers: Vec<String>,
    /// Set by the assigner; `None` when the pool ran dry
    pub source_asset: Option<String>,
}

impl VariantTarget {
    pub fn new(icon_name: &str, key: VariantKey, ext: &str) -> Self {
        let dest_filename = match key.suffix() {
            Some(suffix) => format!("{}-{}.{}", icon_name, suffix, ext),
            None => format!("{}.{}", icon_name, ext),
        };

        Self {
            key,
            dest_filename,
            matchers: key.matchers().iter().map(|m| m.to_string()).collect(),
            source_asset: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.source_asset.is_some()
    }

    /// Destination filename without its extension
    ///
    /// This is what `metadata.json` records for color and wordmark variants,
    /// keeping the metadata independent of the stored format.
    pub fn dest_stem(&self) -> &str {
        match self.dest_filename.rfind('.') {
            Some(idx) => &self.dest_filename[..idx],
            None => &self.dest_filename,
        }
    }

    /// Destination extension, lower-cased
    pub fn dest_extension(&self) -> Option<String> {
        self.dest_filename
            .rfind('.')
            .map(|idx| self.dest_filename[idx + 1..].to_ascii_lowercase())
    }
}
