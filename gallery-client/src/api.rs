//! Client for the gallery REST endpoint.
//!
//! Pages are requested with `GET {endpoint}?page=..&pageSize=..` plus the
//! non-empty filter fields (`category`, `sort`, `keyword`). The body is
//! expected to look like `{ "data": [...], "total": n, "hasMore": bool }`
//! where `total` and `hasMore` are optional.

use std::sync::Arc;

use gallery_core::{EmojiFilter, EmojiItem, PaginatedResponse};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::Deserialize;
use url::Url;
use uuid::Uuid;

use crate::error::{ClientError, ClientResult};

/// Header carrying a per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Resolve a possibly relative endpoint against an origin.
///
/// Absolute URLs are returned as-is; relative ones such as `/api/emojis`
/// are joined onto `origin`.
///
/// # Errors
///
/// Returns [`ClientError::InvalidUrl`] if either URL is malformed.
pub fn resolve_endpoint(origin: &str, endpoint: &str) -> ClientResult<Url> {
    let base = Url::parse(origin).map_err(|e| ClientError::InvalidUrl(format!("{origin}: {e}")))?;
    Url::options()
        .base_url(Some(&base))
        .parse(endpoint)
        .map_err(|e| ClientError::InvalidUrl(format!("{endpoint}: {e}")))
}

/// Build a JSON header map from configured `(name, value)` pairs.
///
/// # Errors
///
/// Returns [`ClientError::InvalidHeader`] if a name or value is not valid HTTP.
pub fn json_headers(extra: &[(String, String)]) -> ClientResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ClientError::InvalidHeader(format!("{name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ClientError::InvalidHeader(format!("{name}: {e}")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Paginated gallery API client.
#[derive(Clone, Debug)]
pub struct ApiClient {
    inner: Arc<InnerClient>,
}

#[derive(Debug)]
struct InnerClient {
    http: Client,
    endpoint: Url,
}

impl ApiClient {
    /// Create a client for `endpoint`, sending `headers` with every request.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidHeader`] for malformed headers and
    /// [`ClientError::Http`] if the HTTP client fails to build.
    pub fn new(endpoint: Url, headers: &[(String, String)]) -> ClientResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("gallery-client/", env!("CARGO_PKG_VERSION")))
            .default_headers(json_headers(headers)?)
            .build()?;

        Ok(Self {
            inner: Arc::new(InnerClient { http, endpoint }),
        })
    }

    /// The endpoint pages are requested from.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// URL for a page request including all non-empty filter fields.
    #[must_use]
    pub fn page_url(&self, page: u32, page_size: u32, filter: &EmojiFilter) -> Url {
        let mut url = self.inner.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("page", &page.to_string())
                .append_pair("pageSize", &page_size.to_string());
            if let Some(category) = filter.category_value() {
                query.append_pair("category", category);
            }
            if let Some(sort) = filter.sort {
                query.append_pair("sort", sort.as_str());
            }
            if let Some(keyword) = filter.keyword() {
                query.append_pair("keyword", keyword);
            }
        }
        url
    }

    /// Fetch one page.
    ///
    /// When the body has no `hasMore` flag it is inferred from a full page.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] on transport failure,
    /// [`ClientError::Status`] on a non-success status and
    /// [`ClientError::Parse`] if the body is not a page.
    pub async fn fetch_page(
        &self,
        page: u32,
        page_size: u32,
        filter: &EmojiFilter,
    ) -> ClientResult<PaginatedResponse> {
        let url = self.page_url(page, page_size, filter);
        let body: ApiPage = get_json(&self.inner.http, url).await?;
        let data = body.data.unwrap_or_default();

        Ok(match body.has_more {
            Some(has_more) => PaginatedResponse {
                data,
                total: body.total,
                has_more,
            }
            .capped(page_size),
            None => PaginatedResponse::inferred(data, body.total, page_size),
        })
    }
}

/// GET `url` with a fresh request id, check the status and parse the JSON body.
pub(crate) async fn get_json<T>(http: &Client, url: Url) -> ClientResult<T>
where
    for<'de> T: Deserialize<'de>,
{
    let request_id = Uuid::new_v4();
    tracing::debug!(%url, %request_id, "GET gallery resource");

    let response = http
        .get(url)
        .header(REQUEST_ID_HEADER, request_id.to_string())
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status { status });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPage {
    #[serde(default)]
    data: Option<Vec<EmojiItem>>,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    has_more: Option<bool>,
}
