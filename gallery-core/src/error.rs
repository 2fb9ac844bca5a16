//! Error types for gallery operations.

use thiserror::Error;

/// Result type for gallery operations.
pub type GalleryResult<T> = Result<T, GalleryError>;

/// Errors that can occur in core gallery operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GalleryError {
    /// Pages are 1-based; zero is never a valid page.
    #[error("Invalid page number: {0} (pages start at 1)")]
    InvalidPage(u32),

    /// A page must hold at least one item.
    #[error("Invalid page size: {0} (must be at least 1)")]
    InvalidPageSize(u32),

    /// The sort key is not one of the supported options.
    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),

    /// The category value is not in the catalog.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}
