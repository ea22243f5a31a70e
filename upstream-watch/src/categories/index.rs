//! Category input files and the generated index.

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

/// A pre-built per-category data file.
///
/// Only the name and item count matter here; everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryFile {
    /// Display name of the category.
    #[serde(default, alias = "category")]
    pub name: Option<String>,

    /// Number of items in the category.
    #[serde(default, alias = "itemCount", alias = "item_count")]
    pub count: Option<u64>,

    /// Items, only counted when no explicit count is present.
    #[serde(default)]
    items: Option<Vec<IgnoredAny>>,
}

impl CategoryFile {
    /// Returns the explicit count, else the number of items, else zero.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.count
            .or_else(|| self.items.as_ref().map(|items| items.len() as u64))
            .unwrap_or(0)
    }
}

/// One category in the generated index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryEntry {
    /// Display name.
    pub name: String,

    /// Data file stem.
    pub slug: String,

    /// Number of items.
    pub count: u64,

    /// When the category last changed.
    pub last_updated: DateTime<Utc>,

    /// Strategy that produced [`CategoryEntry::last_updated`].
    pub source: String,
}

/// The combined `categories.json` index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryIndex {
    /// When the index was generated.
    pub generated_at: DateTime<Utc>,

    /// Sum of all category counts.
    pub total: u64,

    /// Categories, sorted by name.
    pub categories: Vec<CategoryEntry>,
}
