//! # Doro Gallery Client
//!
//! Data fetching for the emoji gallery.
//!
//! - [`EmojiDataService`] - paginated, filtered page fetching with observable state
//! - [`ApiClient`] / [`ApiFetcher`] - the gallery REST endpoint
//! - [`CosClient`] - object storage URLs, signed URLs and uploads
//!
//! ## Usage
//!
//! ```no_run
//! use gallery_client::{EmojiDataService, ServiceOptions};
//! use gallery_core::{FilterPatch, SortKey};
//!
//! # async fn run() -> Result<(), gallery_client::ClientError> {
//! let service = EmojiDataService::new(ServiceOptions::default())?;
//! service.update_filter(FilterPatch::new().sort(SortKey::Likes));
//! let items = service.fetch_page(1).await;
//! if let Some(err) = service.error() {
//!     eprintln!("fetch failed: {err}");
//! }
//! # let _ = items;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod cos;
pub mod error;
pub mod fetcher;
pub mod options;
pub mod service;

pub use api::{resolve_endpoint, ApiClient};
pub use cos::{CosClient, CosConfig, ImageSize, UploadFile};
pub use error::{ClientError, ClientResult, ErrorKind};
pub use fetcher::{ApiFetcher, EmojiFetcher, FetchRequest, FnFetcher};
pub use options::ServiceOptions;
pub use service::{DataSource, EmojiDataService, ServiceState};
