//! # Mock Data
//!
//! Fabricates gallery pages for development and tests.
//!
//! Items are numbered across pages so that page `p` of size `n` holds the
//! items `doro-{(p - 1) * n + 1}` through `doro-{p * n}`. Likes and categories
//! are random. The generated page then goes through the regular filter
//! pipeline, so filtering can only ever shrink a page.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::filter::EmojiFilter;
use crate::item::{Category, EmojiItem};
use crate::page::PaginatedResponse;

/// Configuration for mock pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockConfig {
    /// Simulated network latency before a page is produced.
    pub latency: Duration,
    /// Total item count reported with every page.
    pub total: u64,
    /// Last page that reports more data after it.
    pub max_pages: u32,
    /// Exclusive upper bound for generated like counts.
    pub max_likes: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(800),
            total: 100,
            max_pages: 5,
            max_likes: 100,
        }
    }
}

impl MockConfig {
    /// Default configuration without simulated latency.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            latency: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Generator for mock gallery pages.
#[derive(Debug, Clone)]
pub struct MockGenerator {
    config: MockConfig,
    categories: Vec<Category>,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new(MockConfig::default())
    }
}

impl MockGenerator {
    /// Create a generator with the given configuration.
    #[must_use]
    pub fn new(config: MockConfig) -> Self {
        Self {
            config,
            categories: Category::assignable(),
        }
    }

    /// The generator configuration.
    #[must_use]
    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    /// Generate the raw, unfiltered items for a page.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        page: u32,
        page_size: u32,
    ) -> Vec<EmojiItem> {
        let first = u64::from(page.saturating_sub(1)) * u64::from(page_size);
        (1..=u64::from(page_size))
            .map(|offset| self.create_item(rng, first + offset))
            .collect()
    }

    /// Produce a filtered page using the thread-local RNG.
    #[must_use]
    pub fn page(&self, page: u32, page_size: u32, filter: &EmojiFilter) -> PaginatedResponse {
        self.page_with_rng(&mut rand::thread_rng(), page, page_size, filter)
    }

    /// Produce a filtered page using the supplied RNG.
    pub fn page_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        page: u32,
        page_size: u32,
        filter: &EmojiFilter,
    ) -> PaginatedResponse {
        let data = filter.apply(self.generate(rng, page, page_size));
        let has_more = page < self.config.max_pages && !data.is_empty();
        tracing::debug!(
            page,
            page_size,
            items = data.len(),
            has_more,
            "Generated mock page"
        );
        PaginatedResponse {
            data,
            total: Some(self.config.total),
            has_more,
        }
    }

    fn create_item<R: Rng + ?Sized>(&self, rng: &mut R, sequence: u64) -> EmojiItem {
        let category = self
            .categories
            .choose(rng)
            .cloned()
            .unwrap_or_else(Category::all);
        EmojiItem {
            id: format!("doro-{sequence}"),
            title: format!("Doro emoji {sequence}"),
            likes: rng.gen_range(0..self.config.max_likes.max(1)),
            category,
            image: format!("/api/placeholder/300/300?text=Doro{sequence}"),
        }
    }
}
