//! # Emoji Data Service
//!
//! Fetches gallery pages and publishes loading/error/filter state.
//!
//! ## Strategy selection
//!
//! ```text
//! custom fetcher supplied? ──yes──► fetcher(page, page_size, filter)
//!         │ no                      has_more = items.len() == page_size
//!         ▼
//! mock mode enabled?  ──────yes──► generate page, filter, sort
//!         │ no                      has_more = page < max_pages && !empty
//!         ▼
//! GET {api_url}?page=..&pageSize=..[&category][&sort][&keyword]
//! ```
//!
//! Failures are captured in the published state and yield an empty page.
//! Nothing is retried. Concurrent fetches are not coordinated: whichever
//! finishes last leaves its result in the state.

use std::fmt;
use std::sync::Arc;

use gallery_core::{
    EmojiFilter, EmojiItem, FilterPatch, GalleryError, MockGenerator, PaginatedResponse,
};
use tokio::sync::watch;

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::fetcher::{EmojiFetcher, FetchRequest};
use crate::options::ServiceOptions;

/// Observable state of the data service.
#[derive(Debug, Clone, Default)]
pub struct ServiceState {
    /// A fetch is in flight.
    pub loading: bool,
    /// Error from the most recent fetch, cleared when a fetch starts.
    pub error: Option<Arc<ClientError>>,
    /// Current filter.
    pub filter: EmojiFilter,
    /// Last total count reported by a data source.
    pub total: Option<u64>,
    /// Whether the last successful page reported more data.
    pub has_more: bool,
}

/// Where pages come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// An injected fetcher.
    Custom,
    /// Generated mock data.
    Mock,
    /// The REST API.
    Api,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Custom => "custom",
            Self::Mock => "mock",
            Self::Api => "api",
        })
    }
}

enum Strategy {
    Custom(Arc<dyn EmojiFetcher>),
    Mock(MockGenerator),
    Api(ApiClient),
}

/// Paginated, filterable access to the gallery.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct EmojiDataService {
    inner: Arc<Inner>,
}

struct Inner {
    page_size: u32,
    strategy: Strategy,
    state: watch::Sender<ServiceState>,
}

impl fmt::Debug for EmojiDataService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmojiDataService")
            .field("page_size", &self.inner.page_size)
            .field("source", &self.source())
            .field("state", &*self.inner.state.borrow())
            .finish()
    }
}

impl EmojiDataService {
    /// Create a service using mock data or the API, as configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the options are invalid or the HTTP client fails to build.
    pub fn new(options: ServiceOptions) -> ClientResult<Self> {
        let endpoint = options.validate()?;
        let strategy = if options.use_mock_data {
            Strategy::Mock(MockGenerator::new(options.mock.clone()))
        } else {
            let client = ApiClient::new(endpoint, &options.api_headers)?;
            tracing::debug!(endpoint = %client.endpoint(), "Using gallery API");
            Strategy::Api(client)
        };
        Ok(Self::build(&options, strategy))
    }

    /// Create a service that always uses `fetcher`, regardless of mock mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the options are invalid.
    pub fn with_fetcher<F>(options: ServiceOptions, fetcher: F) -> ClientResult<Self>
    where
        F: EmojiFetcher + 'static,
    {
        options.validate()?;
        Ok(Self::build(&options, Strategy::Custom(Arc::new(fetcher))))
    }

    fn build(options: &ServiceOptions, strategy: Strategy) -> Self {
        let state = ServiceState {
            filter: options.initial_filter.clone(),
            ..ServiceState::default()
        };
        let (state, _) = watch::channel(state);
        Self {
            inner: Arc::new(Inner {
                page_size: options.page_size,
                strategy,
                state,
            }),
        }
    }

    /// Items per page.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.inner.page_size
    }

    /// Where pages come from.
    #[must_use]
    pub fn source(&self) -> DataSource {
        match self.inner.strategy {
            Strategy::Custom(_) => DataSource::Custom,
            Strategy::Mock(_) => DataSource::Mock,
            Strategy::Api(_) => DataSource::Api,
        }
    }

    /// Watch state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ServiceState> {
        self.inner.state.subscribe()
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> ServiceState {
        self.inner.state.borrow().clone()
    }

    /// Whether a fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    /// Error from the most recent fetch.
    #[must_use]
    pub fn error(&self) -> Option<Arc<ClientError>> {
        self.inner.state.borrow().error.clone()
    }

    /// Current filter.
    #[must_use]
    pub fn filter(&self) -> EmojiFilter {
        self.inner.state.borrow().filter.clone()
    }

    /// Last reported total item count.
    #[must_use]
    pub fn total(&self) -> Option<u64> {
        self.inner.state.borrow().total
    }

    /// Whether the last successful page reported more data.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.inner.state.borrow().has_more
    }

    /// Merge a partial filter into the current one. Does not re-fetch.
    pub fn update_filter(&self, patch: FilterPatch) {
        self.inner.state.send_modify(|state| state.filter.merge(patch));
    }

    /// Replace the current filter. Does not re-fetch.
    pub fn set_filter(&self, filter: EmojiFilter) {
        self.inner.state.send_modify(|state| state.filter = filter);
    }

    /// Fetch a page using the current filter.
    pub async fn fetch_page(&self, page: u32) -> Vec<EmojiItem> {
        let filter = self.filter();
        self.fetch(page, &filter).await
    }

    /// Fetch a page with an explicit filter.
    ///
    /// Sets `loading` for the duration of the call and records any failure in
    /// the state. A failed fetch returns no items.
    #[tracing::instrument(skip(self, filter), fields(source = %self.source()))]
    pub async fn fetch(&self, page: u32, filter: &EmojiFilter) -> Vec<EmojiItem> {
        self.inner.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        let _loading = LoadingGuard(&self.inner.state);

        match self.load(page, filter).await {
            Ok(response) => {
                tracing::debug!(
                    items = response.len(),
                    total = ?response.total,
                    has_more = response.has_more,
                    "Fetched page"
                );
                self.inner.state.send_modify(|state| {
                    if response.total.is_some() {
                        state.total = response.total;
                    }
                    state.has_more = response.has_more;
                });
                response.data
            }
            Err(e) => {
                tracing::error!("Failed to fetch emoji page {}: {}", page, e);
                let error = Arc::new(e);
                self.inner.state.send_modify(|state| {
                    state.error = Some(error);
                    state.has_more = false;
                });
                Vec::new()
            }
        }
    }

    /// Fetch a page without touching the published state.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::InvalidPage`] for page 0 and whatever the
    /// active data source fails with.
    pub async fn load(&self, page: u32, filter: &EmojiFilter) -> ClientResult<PaginatedResponse> {
        if page == 0 {
            return Err(GalleryError::InvalidPage(page).into());
        }
        let page_size = self.inner.page_size;

        match &self.inner.strategy {
            Strategy::Custom(fetcher) => {
                let items = fetcher
                    .fetch(FetchRequest {
                        page,
                        page_size,
                        filter: filter.clone(),
                    })
                    .await?;
                Ok(PaginatedResponse::inferred(items, None, page_size))
            }
            Strategy::Mock(generator) => {
                let latency = generator.config().latency;
                if !latency.is_zero() {
                    tokio::time::sleep(latency).await;
                }
                Ok(generator.page(page, page_size, filter))
            }
            Strategy::Api(client) => client.fetch_page(page, page_size, filter).await,
        }
    }
}

/// Clears the loading flag when a fetch ends, including when it is dropped.
struct LoadingGuard<'a>(&'a watch::Sender<ServiceState>);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.send_modify(|state| state.loading = false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FnFetcher;
    use gallery_core::{Category, MockConfig, SortKey};
    use std::time::Duration;

    fn mock_service() -> EmojiDataService {
        EmojiDataService::new(ServiceOptions::mock(MockConfig::instant())).expect("service")
    }

    #[test]
    fn test_source_selection() {
        assert_eq!(mock_service().source(), DataSource::Mock);

        let api = EmojiDataService::new(ServiceOptions::api("/api/emojis")).expect("service");
        assert_eq!(api.source(), DataSource::Api);

        let custom = EmojiDataService::with_fetcher(
            ServiceOptions::default(),
            FnFetcher::new(|_request: FetchRequest| async { Ok(Vec::new()) }),
        )
        .expect("service");
        // A fetcher wins over mock mode
        assert_eq!(custom.source(), DataSource::Custom);
    }

    #[test]
    fn test_initial_state() {
        let filter = EmojiFilter::new().with_keyword("doro");
        let service =
            EmojiDataService::new(ServiceOptions::mock(MockConfig::instant()).with_filter(filter.clone()))
                .expect("service");
        let state = service.snapshot();
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert_eq!(state.filter, filter);
        assert_eq!(state.total, None);
    }

    #[test]
    fn test_update_filter_merges() {
        let service = mock_service();
        service.set_filter(
            EmojiFilter::new()
                .with_category(Category::from_value("cute").unwrap())
                .with_keyword("doro"),
        );
        service.update_filter(FilterPatch::new().sort(SortKey::Newest));

        let filter = service.filter();
        assert_eq!(filter.category_value(), Some("cute"));
        assert_eq!(filter.keyword(), Some("doro"));
        assert_eq!(filter.sort, Some(SortKey::Newest));
    }

    #[tokio::test]
    async fn mock_fetch_updates_state() {
        let service = mock_service();
        let items = service.fetch_page(1).await;

        assert_eq!(items.len(), 10);
        let state = service.snapshot();
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert_eq!(state.total, Some(100));
        assert!(state.has_more);
    }

    #[tokio::test]
    async fn mock_page_six_has_no_more() {
        let service = mock_service();
        service.fetch_page(6).await;
        assert!(!service.has_more());
    }

    #[tokio::test]
    async fn page_zero_is_an_error() {
        let service = mock_service();
        let items = service.fetch_page(0).await;
        assert!(items.is_empty());

        let error = service.error().expect("error recorded");
        assert!(matches!(
            *error,
            ClientError::Gallery(GalleryError::InvalidPage(0))
        ));
        assert!(!service.is_loading());
    }

    #[tokio::test]
    async fn custom_fetcher_infers_has_more() {
        let service = EmojiDataService::with_fetcher(
            ServiceOptions::default().with_page_size(3),
            FnFetcher::new(|request: FetchRequest| async move {
                let count = if request.page == 1 { 3 } else { 1 };
                Ok(MockGenerator::new(MockConfig::instant())
                    .page(request.page, count, &request.filter)
                    .data)
            }),
        )
        .expect("service");

        assert_eq!(service.fetch_page(1).await.len(), 3);
        assert!(service.has_more());
        // Custom fetchers report no total
        assert_eq!(service.total(), None);

        assert_eq!(service.fetch_page(2).await.len(), 1);
        assert!(!service.has_more());
    }

    #[tokio::test]
    async fn custom_fetcher_failure_is_captured() {
        let service = EmojiDataService::with_fetcher(
            ServiceOptions::default(),
            FnFetcher::new(|_request: FetchRequest| async { Err(ClientError::custom("rejected")) }),
        )
        .expect("service");

        assert!(service.fetch_page(1).await.is_empty());
        let state = service.snapshot();
        assert!(!state.loading);
        assert_eq!(
            state.error.map(|e| e.kind()),
            Some(crate::ErrorKind::Custom)
        );
    }

    #[tokio::test]
    async fn error_is_cleared_by_next_fetch() {
        let service = mock_service();
        service.fetch_page(0).await;
        assert!(service.error().is_some());

        service.fetch_page(1).await;
        assert!(service.error().is_none());
    }

    #[tokio::test]
    async fn loading_is_visible_while_in_flight() {
        let service = EmojiDataService::new(ServiceOptions::mock(MockConfig {
            latency: Duration::from_millis(100),
            ..MockConfig::default()
        }))
        .expect("service");
        let mut state = service.subscribe();

        let task = tokio::spawn({
            let service = service.clone();
            async move { service.fetch_page(1).await }
        });

        state
            .wait_for(|s| s.loading)
            .await
            .expect("loading observed");
        state
            .wait_for(|s| !s.loading)
            .await
            .expect("loading cleared");

        let items = task.await.expect("task");
        assert_eq!(items.len(), 10);
    }

    #[tokio::test]
    async fn dropped_fetch_clears_loading() {
        let service = EmojiDataService::new(ServiceOptions::mock(MockConfig {
            latency: Duration::from_secs(60),
            ..MockConfig::default()
        }))
        .expect("service");

        let result =
            tokio::time::timeout(Duration::from_millis(20), service.fetch_page(1)).await;
        assert!(result.is_err());
        assert!(!service.is_loading());
    }
}
