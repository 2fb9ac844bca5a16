//! # Doro Gallery Core
//!
//! Core gallery logic shared by every front-end.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                gallery-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Data Model      │  Filter Pipeline         │
//! │  - EmojiItem     │  - Category equality     │
//! │  - Category      │  - Keyword search        │
//! │  - Pages         │  - Stable sort           │
//! ├─────────────────────────────────────────────┤
//! │  Mock Generator                             │
//! │  - Numbered items, random likes/categories  │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod filter;
pub mod item;
pub mod mock;
pub mod page;

pub use error::{GalleryError, GalleryResult};
pub use filter::{EmojiFilter, FilterPatch, SortKey};
pub use item::{Category, EmojiItem, ALL_CATEGORY, CATEGORY_CATALOG};
pub use mock::{MockConfig, MockGenerator};
pub use page::PaginatedResponse;

/// Gallery core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
