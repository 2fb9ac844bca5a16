//! # Doro Gallery CLI
//!
//! Terminal front-end for browsing the emoji gallery.
//!
//! ## Usage
//!
//! ```bash
//! # Mock data, page 1, most liked first
//! cargo run -p gallery-cli -- browse --sort likes
//!
//! # Real API
//! cargo run -p gallery-cli -- --api-url https://gallery.example.com/api/emojis browse --pages 3
//!
//! # Object storage helpers
//! cargo run -p gallery-cli -- image-url 42 --size large
//! cargo run -p gallery-cli -- upload ./doro.png
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `GalleryConfig` - Data service and object storage configuration
//! - `commands` - One async function per subcommand

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

pub mod commands;

use std::time::Duration;

use clap::{Parser, Subcommand};
use gallery_client::{CosConfig, ImageSize, ServiceOptions};
use gallery_core::{Category, EmojiFilter, MockConfig, SortKey};

/// Command-line arguments for the gallery CLI.
#[derive(Debug, Clone, Parser)]
#[command(name = "gallery")]
#[command(about = "Browse the Doro emoji gallery")]
#[command(version)]
pub struct CliArgs {
    /// Gallery REST endpoint. Mock data is used when unset.
    #[arg(long, env = "GALLERY_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Origin that relative endpoints are resolved against
    #[arg(
        long,
        env = "GALLERY_ORIGIN",
        default_value = gallery_client::options::DEFAULT_ORIGIN,
        global = true
    )]
    pub origin: String,

    /// Items per page
    #[arg(long, env = "GALLERY_PAGE_SIZE", default_value = "10", global = true)]
    pub page_size: u32,

    /// Extra request header as `name:value` (repeatable)
    #[arg(long = "header", value_parser = parse_header, global = true)]
    pub headers: Vec<(String, String)>,

    /// Simulated latency for mock pages in milliseconds
    #[arg(long, default_value = "0", global = true)]
    pub mock_latency_ms: u64,

    /// Storage bucket name
    #[arg(long, env = "GALLERY_COS_BUCKET", default_value = "doro-emoji", global = true)]
    pub cos_bucket: String,

    /// Storage bucket region
    #[arg(long, env = "GALLERY_COS_REGION", default_value = "ap-guangzhou", global = true)]
    pub cos_region: String,

    /// Override the direct bucket URL
    #[arg(long, env = "GALLERY_COS_BASE_URL", global = true)]
    pub cos_base_url: Option<String>,

    /// CDN URL in front of the bucket
    #[arg(long, env = "GALLERY_COS_CDN_URL", global = true)]
    pub cos_cdn_url: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Gallery subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List gallery pages
    Browse {
        /// First page to fetch (1-based)
        #[arg(long, default_value = "1")]
        page: u32,

        /// Number of consecutive pages to fetch
        #[arg(long, default_value = "1")]
        pages: u32,

        /// Category value (all, cute, funny, expression, daily)
        #[arg(long, value_parser = parse_category)]
        category: Option<Category>,

        /// Sort order (popular, newest, likes, downloads)
        #[arg(long)]
        sort: Option<SortKey>,

        /// Title keyword
        #[arg(long)]
        keyword: Option<String>,

        /// Print pages as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the public URL of an emoji image
    ImageUrl {
        /// Emoji id
        id: String,

        /// Rendition (small, medium, large)
        #[arg(long, default_value = "medium")]
        size: ImageSize,
    },
    /// Print a signed URL for a private object
    SignedUrl {
        /// Object key
        key: String,

        /// Lifetime in seconds
        #[arg(long, default_value = "3600")]
        expires: u64,
    },
    /// Print the URL of a random emoji
    Random,
    /// Upload an emoji image
    Upload {
        /// File to upload
        path: std::path::PathBuf,
    },
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    raw.split_once(':')
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected `name:value`, got `{raw}`"))
}

fn parse_category(raw: &str) -> Result<Category, String> {
    Category::from_value(raw).map_err(|e| e.to_string())
}

/// Resolved configuration for a CLI run.
#[derive(Debug, Clone)]
pub struct GalleryConfig {
    /// Data service options.
    pub service: ServiceOptions,
    /// Object storage configuration.
    pub cos: CosConfig,
}

impl From<&CliArgs> for GalleryConfig {
    fn from(args: &CliArgs) -> Self {
        let mock = MockConfig {
            latency: Duration::from_millis(args.mock_latency_ms),
            ..MockConfig::default()
        };
        let mut service = match &args.api_url {
            Some(url) => ServiceOptions::api(url.clone()),
            None => ServiceOptions::mock(mock),
        }
        .with_origin(args.origin.clone())
        .with_page_size(args.page_size);
        service.api_headers.clone_from(&args.headers);

        if let Command::Browse {
            category,
            sort,
            keyword,
            ..
        } = &args.command
        {
            service.initial_filter = EmojiFilter {
                category: category.clone(),
                sort: *sort,
                keyword: keyword.clone(),
            };
        }

        let mut cos = CosConfig::new(args.cos_bucket.clone(), args.cos_region.clone())
            .with_origin(args.origin.clone());
        if let Some(base) = &args.cos_base_url {
            cos.base_url.clone_from(base);
        }
        cos.cdn_base_url.clone_from(&args.cos_cdn_url);

        Self { service, cos }
    }
}
