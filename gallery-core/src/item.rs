//! Emoji items and the category catalog.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{GalleryError, GalleryResult};

/// Category value that disables category filtering.
pub const ALL_CATEGORY: &str = "all";

/// The fixed category catalog as `(value, label)` pairs.
///
/// The first entry is always the "all" pseudo-category.
pub const CATEGORY_CATALOG: [(&str, &str); 5] = [
    (ALL_CATEGORY, "All"),
    ("cute", "Cute"),
    ("funny", "Funny"),
    ("expression", "Expression"),
    ("daily", "Daily"),
];

/// A gallery category as a label/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    /// Human readable label.
    pub label: String,
    /// Stable value used for filtering and query parameters.
    pub value: String,
}

impl Category {
    /// Create a category from a label and value.
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// The "all" pseudo-category.
    #[must_use]
    pub fn all() -> Self {
        let (value, label) = CATEGORY_CATALOG[0];
        Self::new(label, value)
    }

    /// Look up a catalog category by its value.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::UnknownCategory`] if the value is not in the catalog.
    pub fn from_value(value: &str) -> GalleryResult<Self> {
        CATEGORY_CATALOG
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(v, label)| Self::new(*label, *v))
            .ok_or_else(|| GalleryError::UnknownCategory(value.to_string()))
    }

    /// Every catalog category, "all" first.
    #[must_use]
    pub fn catalog() -> Vec<Self> {
        CATEGORY_CATALOG
            .iter()
            .map(|(value, label)| Self::new(*label, *value))
            .collect()
    }

    /// Catalog categories an item can actually belong to (everything but "all").
    #[must_use]
    pub fn assignable() -> Vec<Self> {
        Self::catalog().into_iter().skip(1).collect()
    }

    /// Whether this category disables filtering.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.value == ALL_CATEGORY
    }
}

/// A single emoji image in the gallery.
///
/// Items are immutable snapshots; a page is re-fetched rather than updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiItem {
    /// Opaque identifier. Numeric ids in API payloads are kept as strings.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Display title.
    pub title: String,
    /// Number of likes.
    pub likes: u64,
    /// Category the item belongs to.
    pub category: Category,
    /// Image URL.
    pub image: String,
}

impl EmojiItem {
    /// Numeric suffix of the identifier, used to order items by recency.
    ///
    /// The suffix is whatever follows the last `-`. Identifiers without a
    /// numeric suffix rank as 0.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.id
            .rsplit('-')
            .next()
            .and_then(|suffix| suffix.parse().ok())
            .unwrap_or(0)
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}
