//! Pluggable page fetchers.
//!
//! A fetcher returns the complete item list for one page. The orchestrator
//! infers whether more pages exist from whether the page came back full.

use std::future::Future;

use async_trait::async_trait;
use gallery_core::{EmojiFilter, EmojiItem};
use url::Url;

use crate::api::ApiClient;
use crate::error::ClientResult;

/// Arguments passed to a fetcher for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// 1-based page number.
    pub page: u32,
    /// Configured page size.
    pub page_size: u32,
    /// Filter in effect for this request.
    pub filter: EmojiFilter,
}

/// Source of gallery pages.
#[async_trait]
pub trait EmojiFetcher: Send + Sync {
    /// Fetch the items for one page.
    async fn fetch(&self, request: FetchRequest) -> ClientResult<Vec<EmojiItem>>;
}

/// Adapter turning an async closure into an [`EmojiFetcher`].
///
/// ```
/// use gallery_client::{FetchRequest, FnFetcher};
///
/// let fetcher = FnFetcher::new(|request: FetchRequest| async move {
///     let _ = request.page;
///     Ok(Vec::new())
/// });
/// # let _ = fetcher;
/// ```
pub struct FnFetcher<F> {
    f: F,
}

impl<F, Fut> FnFetcher<F>
where
    F: Fn(FetchRequest) -> Fut + Send + Sync,
    Fut: Future<Output = ClientResult<Vec<EmojiItem>>> + Send,
{
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> EmojiFetcher for FnFetcher<F>
where
    F: Fn(FetchRequest) -> Fut + Send + Sync,
    Fut: Future<Output = ClientResult<Vec<EmojiItem>>> + Send,
{
    async fn fetch(&self, request: FetchRequest) -> ClientResult<Vec<EmojiItem>> {
        (self.f)(request).await
    }
}

/// Fetcher backed by a REST endpoint, returning only the `data` array.
#[derive(Clone, Debug)]
pub struct ApiFetcher {
    client: ApiClient,
}

impl ApiFetcher {
    /// Create a fetcher for `endpoint` sending `headers` with every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the headers are invalid or the HTTP client fails to build.
    pub fn new(endpoint: Url, headers: &[(String, String)]) -> ClientResult<Self> {
        Ok(Self {
            client: ApiClient::new(endpoint, headers)?,
        })
    }
}

#[async_trait]
impl EmojiFetcher for ApiFetcher {
    async fn fetch(&self, request: FetchRequest) -> ClientResult<Vec<EmojiItem>> {
        let page = self
            .client
            .fetch_page(request.page, request.page_size, &request.filter)
            .await?;
        Ok(page.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::resolve_endpoint;
    use crate::error::ClientError;
    use gallery_core::{Category, SortKey};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fn_fetcher_receives_request() {
        let fetcher = FnFetcher::new(|request: FetchRequest| async move {
            assert_eq!(request.page, 4);
            assert_eq!(request.page_size, 12);
            assert_eq!(request.filter.sort, Some(SortKey::Likes));
            Ok(Vec::new())
        });

        let items = fetcher
            .fetch(FetchRequest {
                page: 4,
                page_size: 12,
                filter: EmojiFilter::new().with_sort(SortKey::Likes),
            })
            .await
            .expect("items");
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn fn_fetcher_propagates_errors() {
        let fetcher =
            FnFetcher::new(|_request: FetchRequest| async { Err(ClientError::custom("offline")) });
        let err = fetcher
            .fetch(FetchRequest {
                page: 1,
                page_size: 10,
                filter: EmojiFilter::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "custom fetcher failed: offline");
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn api_fetcher_returns_data() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/emojis"))
            .and(query_param("category", "daily"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "id": "doro-1",
                    "title": "Morning Doro",
                    "likes": 3,
                    "category": { "label": "Daily", "value": "daily" },
                    "image": "https://cdn.example.com/1.png"
                }],
                "hasMore": true
            })))
            .mount(&server)
            .await;

        let endpoint = resolve_endpoint(&server.uri(), "/emojis").expect("endpoint");
        let fetcher = ApiFetcher::new(endpoint, &[]).expect("fetcher");
        let items = fetcher
            .fetch(FetchRequest {
                page: 1,
                page_size: 10,
                filter: EmojiFilter::new().with_category(Category::new("Daily", "daily")),
            })
            .await
            .expect("items");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Morning Doro");
    }
}
