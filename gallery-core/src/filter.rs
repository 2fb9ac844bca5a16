//! Gallery filters and the filter pipeline.
//!
//! The pipeline always runs in the same order:
//!
//! ```text
//! items ─► category equality ─► keyword substring ─► stable sort
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GalleryError;
use crate::item::{Category, EmojiItem};

/// Supported sort orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Most popular first. Server-side ordering; no local reordering.
    Popular,
    /// Most recently uploaded first.
    Newest,
    /// Most liked first.
    Likes,
    /// Most downloaded first. Server-side ordering; no local reordering.
    Downloads,
}

impl SortKey {
    /// Every sort key in display order.
    pub const ALL: [SortKey; 4] = [Self::Popular, Self::Newest, Self::Likes, Self::Downloads];

    /// Wire representation used in query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::Newest => "newest",
            Self::Likes => "likes",
            Self::Downloads => "downloads",
        }
    }

    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Popular => "Most popular",
            Self::Newest => "Newest",
            Self::Likes => "Most liked",
            Self::Downloads => "Most downloaded",
        }
    }

    /// Sort items in place. Stable; keys without a local comparator leave
    /// the order untouched.
    pub fn sort(self, items: &mut [EmojiItem]) {
        match self {
            Self::Newest => items.sort_by(|a, b| b.sequence().cmp(&a.sequence())),
            Self::Likes => items.sort_by(|a, b| b.likes.cmp(&a.likes)),
            Self::Popular | Self::Downloads => {}
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| GalleryError::UnknownSortKey(s.to_string()))
    }
}

/// Current filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiFilter {
    /// Selected category, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Selected sort order, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortKey>,
    /// Search keyword, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

impl EmojiFilter {
    /// An empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Set the sort key.
    #[must_use]
    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Set the keyword.
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Category value to filter on. `None` when absent, empty or "all".
    #[must_use]
    pub fn category_value(&self) -> Option<&str> {
        self.category
            .as_ref()
            .filter(|category| !category.is_all() && !category.value.is_empty())
            .map(|category| category.value.as_str())
    }

    /// Keyword to search for. `None` when absent or empty.
    #[must_use]
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref().filter(|keyword| !keyword.is_empty())
    }

    /// Merge a partial update field-by-field.
    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(sort) = patch.sort {
            self.sort = sort;
        }
        if let Some(keyword) = patch.keyword {
            self.keyword = keyword;
        }
    }

    /// Whether an item passes the category and keyword predicates.
    #[must_use]
    pub fn matches(&self, item: &EmojiItem) -> bool {
        if let Some(value) = self.category_value() {
            if item.category.value != value {
                return false;
            }
        }
        match self.keyword() {
            Some(keyword) => item
                .title
                .to_lowercase()
                .contains(&keyword.to_lowercase()),
            None => true,
        }
    }

    /// Run the full pipeline over a page of items.
    #[must_use]
    pub fn apply(&self, items: Vec<EmojiItem>) -> Vec<EmojiItem> {
        let mut items: Vec<EmojiItem> = items.into_iter().filter(|i| self.matches(i)).collect();
        if let Some(sort) = self.sort {
            sort.sort(&mut items);
        }
        items
    }
}

/// A partial filter update.
///
/// Untouched fields keep their current value when merged. Fields can also be
/// cleared explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    category: Option<Option<Category>>,
    sort: Option<Option<SortKey>>,
    keyword: Option<Option<String>>,
}

impl FilterPatch {
    /// An empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the category.
    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(Some(category));
        self
    }

    /// Clear the category.
    #[must_use]
    pub fn clear_category(mut self) -> Self {
        self.category = Some(None);
        self
    }

    /// Set the sort key.
    #[must_use]
    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = Some(Some(sort));
        self
    }

    /// Clear the sort key.
    #[must_use]
    pub fn clear_sort(mut self) -> Self {
        self.sort = Some(None);
        self
    }

    /// Set the keyword.
    #[must_use]
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(Some(keyword.into()));
        self
    }

    /// Clear the keyword.
    #[must_use]
    pub fn clear_keyword(mut self) -> Self {
        self.keyword = Some(None);
        self
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.sort.is_none() && self.keyword.is_none()
    }
}

impl From<EmojiFilter> for FilterPatch {
    /// A patch that replaces every field.
    fn from(filter: EmojiFilter) -> Self {
        Self {
            category: Some(filter.category),
            sort: Some(filter.sort),
            keyword: Some(filter.keyword),
        }
    }
}
