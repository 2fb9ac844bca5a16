//! Configuration for the data service.

use gallery_core::{EmojiFilter, GalleryError, MockConfig};

use crate::api::resolve_endpoint;
use crate::error::ClientResult;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Default REST endpoint, relative to the origin.
pub const DEFAULT_API_URL: &str = "/api/emojis";

/// Default origin relative endpoints are resolved against.
pub const DEFAULT_ORIGIN: &str = "http://localhost:5173";

/// Options for [`EmojiDataService`](crate::EmojiDataService).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOptions {
    /// Items per page. Fixed for the lifetime of the service.
    pub page_size: u32,
    /// Filter in effect before any update.
    pub initial_filter: EmojiFilter,
    /// Serve generated pages instead of calling the API.
    pub use_mock_data: bool,
    /// REST endpoint, absolute or relative to `origin`.
    pub api_url: String,
    /// Origin relative endpoints are resolved against.
    pub origin: String,
    /// Extra headers sent with every API request.
    pub api_headers: Vec<(String, String)>,
    /// Mock page configuration.
    pub mock: MockConfig,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            initial_filter: EmojiFilter::default(),
            use_mock_data: true,
            api_url: DEFAULT_API_URL.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            api_headers: Vec::new(),
            mock: MockConfig::default(),
        }
    }
}

impl ServiceOptions {
    /// Options for calling a real API at `api_url`.
    #[must_use]
    pub fn api(api_url: impl Into<String>) -> Self {
        Self {
            use_mock_data: false,
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    /// Options for mock pages with the given mock configuration.
    #[must_use]
    pub fn mock(mock: MockConfig) -> Self {
        Self {
            use_mock_data: true,
            mock,
            ..Self::default()
        }
    }

    /// Set the page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the initial filter.
    #[must_use]
    pub fn with_filter(mut self, filter: EmojiFilter) -> Self {
        self.initial_filter = filter;
        self
    }

    /// Set the origin.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Add a header sent with every API request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.api_headers.push((name.into(), value.into()));
        self
    }

    /// Check the options and resolve the API endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::InvalidPageSize`] for a zero page size and
    /// [`crate::ClientError::InvalidUrl`] if the endpoint cannot be resolved.
    pub fn validate(&self) -> ClientResult<url::Url> {
        if self.page_size == 0 {
            return Err(GalleryError::InvalidPageSize(self.page_size).into());
        }
        resolve_endpoint(&self.origin, &self.api_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;

    #[test]
    fn test_defaults() {
        let options = ServiceOptions::default();
        assert_eq!(options.page_size, 10);
        assert!(options.use_mock_data);
        assert_eq!(options.api_url, "/api/emojis");
        assert!(options.api_headers.is_empty());
    }

    #[test]
    fn test_validate_resolves_endpoint() {
        let url = ServiceOptions::api("/v2/emojis")
            .with_origin("https://gallery.example.com")
            .validate()
            .expect("valid");
        assert_eq!(url.as_str(), "https://gallery.example.com/v2/emojis");
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = ServiceOptions::default()
            .with_page_size(0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Gallery(GalleryError::InvalidPageSize(0))
        ));
    }
}
