//! Paginated responses.

use serde::{Deserialize, Serialize};

use crate::item::EmojiItem;

/// One page of gallery items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse {
    /// Items on this page, in display order.
    #[serde(default)]
    pub data: Vec<EmojiItem>,
    /// Total number of items across all pages, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Whether another page can be requested.
    pub has_more: bool,
}

impl PaginatedResponse {
    /// Build a response whose `has_more` flag is inferred from a full page.
    ///
    /// Items beyond `page_size` are dropped so a page never outgrows its size.
    #[must_use]
    pub fn inferred(mut data: Vec<EmojiItem>, total: Option<u64>, page_size: u32) -> Self {
        let limit = page_size as usize;
        if data.len() > limit {
            tracing::warn!(
                "Truncating page of {} items to page size {}",
                data.len(),
                limit
            );
            data.truncate(limit);
        }
        let has_more = data.len() == limit;
        Self {
            data,
            total,
            has_more,
        }
    }

    /// Drop items beyond `page_size`, keeping the existing `has_more` flag.
    #[must_use]
    pub fn capped(mut self, page_size: u32) -> Self {
        let limit = page_size as usize;
        if self.data.len() > limit {
            tracing::warn!(
                "Truncating page of {} items to page size {}",
                self.data.len(),
                limit
            );
            self.data.truncate(limit);
        }
        self
    }

    /// Number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the page is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
