//! Subcommand implementations.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use gallery_client::{CosClient, EmojiDataService, ImageSize, UploadFile};
use gallery_core::{EmojiFilter, EmojiItem};
use serde_json::json;

use crate::{Command, GalleryConfig};

/// Run a subcommand, writing results to stdout.
///
/// # Errors
///
/// Returns an error if a client cannot be built, a page fails to load, or an
/// upload fails.
pub async fn run(command: Command, config: GalleryConfig) -> anyhow::Result<()> {
    match command {
        Command::Browse {
            page, pages, json, ..
        } => browse(config, page, pages, json).await,
        Command::ImageUrl { id, size } => image_url(config, &id, size),
        Command::SignedUrl { key, expires } => {
            let cos = CosClient::new(config.cos)?;
            println!("{}", cos.signed_url(&key, Duration::from_secs(expires)).await);
            Ok(())
        }
        Command::Random => {
            let cos = CosClient::new(config.cos)?;
            println!("{}", cos.random_emoji_url().await);
            Ok(())
        }
        Command::Upload { path } => upload(config, &path).await,
    }
}

async fn browse(config: GalleryConfig, first: u32, pages: u32, json: bool) -> anyhow::Result<()> {
    let service = EmojiDataService::new(config.service)?;
    tracing::info!(
        "Browsing {} page(s) from {} source, {}",
        pages,
        service.source(),
        describe_filter(&service.filter())
    );

    for page in first..first.saturating_add(pages) {
        let items = service.fetch_page(page).await;
        if let Some(err) = service.error() {
            anyhow::bail!("failed to load page {page}: {err}");
        }

        let state = service.snapshot();
        if json {
            let output = json!({
                "page": page,
                "data": items,
                "total": state.total,
                "hasMore": state.has_more,
            });
            println!("{output}");
        } else {
            println!("-- page {page} ({} items) --", items.len());
            for item in &items {
                println!("{}", format_item(item));
            }
        }

        if !state.has_more {
            tracing::debug!("No more pages after {}", page);
            break;
        }
    }
    Ok(())
}

fn image_url(config: GalleryConfig, id: &str, size: ImageSize) -> anyhow::Result<()> {
    let cos = CosClient::new(config.cos)?;
    println!("{}", cos.emoji_image_url(id, size));
    Ok(())
}

async fn upload(config: GalleryConfig, path: &Path) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("emoji")
        .to_string();

    let cos = CosClient::new(config.cos)?;
    let url = cos.upload_emoji(UploadFile::new(file_name, bytes)).await?;
    println!("{url}");
    Ok(())
}

/// Human readable summary of a filter.
#[must_use]
pub fn describe_filter(filter: &EmojiFilter) -> String {
    let category = filter
        .category
        .as_ref()
        .map_or("All", |category| category.label.as_str());
    let mut out = format!("category: {category}");
    if let Some(sort) = filter.sort {
        out.push_str(&format!(", sort: {}", sort.label()));
    }
    if let Some(keyword) = filter.keyword() {
        out.push_str(&format!(", keyword: {keyword:?}"));
    }
    out
}

/// One-line rendering of an item.
#[must_use]
pub fn format_item(item: &EmojiItem) -> String {
    format!(
        "{:<12} {:>5} likes  [{}] {}  {}",
        item.id, item.likes, item.category.value, item.title, item.image
    )
}
