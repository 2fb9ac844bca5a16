//! Object storage (COS) helpers.
//!
//! Public objects are addressed by plain concatenation of a base URL and the
//! object key; nothing is signed locally. Private objects go through a
//! server-side signing endpoint, and uploads through a server-side upload
//! endpoint. Lookups that only feed an `<img>` fall back to placeholder URLs
//! instead of failing.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::api::{get_json, resolve_endpoint};
use crate::error::{ClientError, ClientResult};

/// Returned by [`CosClient::signed_url`] when signing fails.
pub const SIGNED_URL_FALLBACK: &str = "/api/placeholder/300/300?text=load-failed";

/// Returned by [`CosClient::random_emoji_url`] when the lookup fails.
pub const RANDOM_URL_FALLBACK: &str = "/api/placeholder/300/300?text=Random";

/// Default lifetime of a signed URL.
pub const DEFAULT_SIGNED_URL_TTL: Duration = Duration::from_secs(3600);

/// Storage bucket and service endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CosConfig {
    /// Bucket name.
    pub bucket: String,
    /// Bucket region.
    pub region: String,
    /// Direct bucket URL.
    pub base_url: String,
    /// CDN URL in front of the bucket. Falls back to `base_url` when unset.
    pub cdn_base_url: Option<String>,
    /// Origin that relative service endpoints are resolved against.
    pub origin: String,
    /// Endpoint issuing signed URLs.
    pub signing_endpoint: String,
    /// Endpoint returning a random emoji.
    pub random_endpoint: String,
    /// Endpoint accepting multipart uploads.
    pub upload_endpoint: String,
}

impl CosConfig {
    /// Configuration for a bucket, using the regional bucket URL.
    #[must_use]
    pub fn new(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        let bucket = bucket.into();
        let region = region.into();
        Self {
            base_url: format!("https://{bucket}.cos.{region}.myqcloud.com"),
            bucket,
            region,
            cdn_base_url: None,
            origin: "http://localhost:5173".to_string(),
            signing_endpoint: "/api/cos/get-signed-url".to_string(),
            random_endpoint: "/api/emojis/random".to_string(),
            upload_endpoint: "/api/cos/upload-emoji".to_string(),
        }
    }

    /// Serve public objects through a CDN.
    #[must_use]
    pub fn with_cdn(mut self, cdn_base_url: impl Into<String>) -> Self {
        self.cdn_base_url = Some(cdn_base_url.into());
        self
    }

    /// Resolve service endpoints against `origin`.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }
}

impl Default for CosConfig {
    fn default() -> Self {
        Self::new("doro-emoji", "ap-guangzhou")
    }
}

/// Rendition of an emoji image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageSize {
    /// Thumbnail.
    Small,
    /// Medium rendition.
    #[default]
    Medium,
    /// Original upload.
    Large,
}

impl ImageSize {
    /// Storage directory holding this rendition.
    #[must_use]
    pub const fn directory(self) -> &'static str {
        match self {
            Self::Small => "thumbnails",
            Self::Medium => "medium",
            Self::Large => "original",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        })
    }
}

impl FromStr for ImageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            other => Err(format!("unknown image size: {other}")),
        }
    }
}

/// A file to upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// File name sent with the multipart part.
    pub file_name: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
    /// MIME type of the content.
    pub mime: String,
}

impl UploadFile {
    /// Create an upload, guessing the MIME type from the file extension.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = guess_mime(&file_name).to_string();
        Self {
            file_name,
            bytes,
            mime,
        }
    }
}

fn guess_mime(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Client for object storage URLs and the storage-side service endpoints.
#[derive(Clone, Debug)]
pub struct CosClient {
    http: Client,
    config: CosConfig,
    signing: Url,
    random: Url,
    upload: Url,
}

impl CosClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if an endpoint cannot be resolved
    /// and [`ClientError::Http`] if the HTTP client fails to build.
    pub fn new(config: CosConfig) -> ClientResult<Self> {
        let signing = resolve_endpoint(&config.origin, &config.signing_endpoint)?;
        let random = resolve_endpoint(&config.origin, &config.random_endpoint)?;
        let upload = resolve_endpoint(&config.origin, &config.upload_endpoint)?;
        let http = Client::builder()
            .user_agent(concat!("gallery-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config,
            signing,
            random,
            upload,
        })
    }

    /// Public URL of an object. No signing is performed.
    #[must_use]
    pub fn public_url(&self, object_key: &str, use_cdn: bool) -> String {
        let base = if use_cdn {
            self.config
                .cdn_base_url
                .as_deref()
                .unwrap_or(&self.config.base_url)
        } else {
            &self.config.base_url
        };
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            object_key.trim_start_matches('/')
        )
    }

    /// Public CDN URL of an emoji image rendition.
    #[must_use]
    pub fn emoji_image_url(&self, emoji_id: impl fmt::Display, size: ImageSize) -> String {
        let key = format!("emojis/{}/doro-emoji-{emoji_id}.png", size.directory());
        self.public_url(&key, true)
    }

    /// Signed URL for a private object, or [`SIGNED_URL_FALLBACK`] on failure.
    pub async fn signed_url(&self, object_key: &str, expires: Duration) -> String {
        match self.try_signed_url(object_key, expires).await {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Failed to fetch signed URL for {}: {}", object_key, e);
                SIGNED_URL_FALLBACK.to_string()
            }
        }
    }

    /// Request a signed URL from the signing endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status or a body
    /// without `signedUrl`.
    pub async fn try_signed_url(&self, object_key: &str, expires: Duration) -> ClientResult<String> {
        let mut url = self.signing.clone();
        url.query_pairs_mut()
            .append_pair("objectKey", object_key)
            .append_pair("expireSeconds", &expires.as_secs().to_string());

        let body: SignedUrlResponse = get_json(&self.http, url).await?;
        Ok(body.signed_url)
    }

    /// URL of a random emoji, or [`RANDOM_URL_FALLBACK`] on failure.
    pub async fn random_emoji_url(&self) -> String {
        match get_json::<ImageUrlResponse>(&self.http, self.random.clone()).await {
            Ok(body) => body.image_url,
            Err(e) => {
                tracing::error!("Failed to fetch random emoji: {}", e);
                RANDOM_URL_FALLBACK.to_string()
            }
        }
    }

    /// Upload an emoji image, returning its URL.
    ///
    /// # Errors
    ///
    /// Every failure is reported as [`ClientError::Upload`].
    pub async fn upload_emoji(&self, file: UploadFile) -> ClientResult<String> {
        let file_name = file.file_name.clone();
        let size = file.bytes.len();
        match self.send_upload(file).await {
            Ok(url) => {
                tracing::info!("Uploaded {} ({} bytes) to {}", file_name, size, url);
                Ok(url)
            }
            Err(e) => {
                tracing::error!("Failed to upload {}: {}", file_name, e);
                Err(ClientError::Upload(e.to_string()))
            }
        }
    }

    async fn send_upload(&self, file: UploadFile) -> ClientResult<String> {
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime)?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(self.upload.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status { status });
        }

        let body: ImageUrlResponse = serde_json::from_slice(&response.bytes().await?)?;
        Ok(body.image_url)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignedUrlResponse {
    signed_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageUrlResponse {
    image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::REQUEST_ID_HEADER;
    use crate::ErrorKind;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> CosClient {
        CosClient::new(CosConfig::default().with_cdn("https://cdn.example.com/")).expect("client")
    }

    fn client_for(server: &MockServer) -> CosClient {
        CosClient::new(CosConfig::default().with_origin(server.uri())).expect("client")
    }

    // =========================================================================
    // Unit tests that don't require network/wiremock

    #[test]
    fn test_default_base_url() {
        let config = CosConfig::default();
        assert_eq!(
            config.base_url,
            "https://doro-emoji.cos.ap-guangzhou.myqcloud.com"
        );
        assert_eq!(config.cdn_base_url, None);
    }

    #[test]
    fn test_public_url() {
        let cos = client();
        assert_eq!(
            cos.public_url("emojis/a.png", true),
            "https://cdn.example.com/emojis/a.png"
        );
        assert_eq!(
            cos.public_url("emojis/a.png", false),
            "https://doro-emoji.cos.ap-guangzhou.myqcloud.com/emojis/a.png"
        );
    }

    #[test]
    fn test_public_url_without_cdn_uses_bucket() {
        let cos = CosClient::new(CosConfig::default()).expect("client");
        assert_eq!(
            cos.public_url("a.png", true),
            "https://doro-emoji.cos.ap-guangzhou.myqcloud.com/a.png"
        );
    }

    #[test]
    fn test_emoji_image_url_sizes() {
        let cos = client();
        assert_eq!(
            cos.emoji_image_url(7, ImageSize::Small),
            "https://cdn.example.com/emojis/thumbnails/doro-emoji-7.png"
        );
        assert_eq!(
            cos.emoji_image_url("7", ImageSize::default()),
            "https://cdn.example.com/emojis/medium/doro-emoji-7.png"
        );
        assert_eq!(
            cos.emoji_image_url(7, ImageSize::Large),
            "https://cdn.example.com/emojis/original/doro-emoji-7.png"
        );
    }

    #[test]
    fn test_image_size_from_str() {
        assert_eq!("large".parse::<ImageSize>(), Ok(ImageSize::Large));
        assert!("huge".parse::<ImageSize>().is_err());
        assert_eq!(ImageSize::Small.to_string(), "small");
    }

    #[test]
    fn test_guess_mime() {
        assert_eq!(UploadFile::new("doro.PNG", vec![]).mime, "image/png");
        assert_eq!(UploadFile::new("doro.jpeg", vec![]).mime, "image/jpeg");
        assert_eq!(
            UploadFile::new("doro", vec![]).mime,
            "application/octet-stream"
        );
    }

    // =========================================================================

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn signed_url_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/cos/get-signed-url"))
            .and(query_param("objectKey", "private/doro.png"))
            .and(query_param("expireSeconds", "3600"))
            .and(header_exists(REQUEST_ID_HEADER))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "signedUrl": "https://bucket.example.com/private/doro.png?sign=abc"
            })))
            .mount(&server)
            .await;

        let url = client_for(&server)
            .signed_url("private/doro.png", DEFAULT_SIGNED_URL_TTL)
            .await;
        assert_eq!(url, "https://bucket.example.com/private/doro.png?sign=abc");
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn signed_url_falls_back_on_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let cos = client_for(&server);
        let url = cos.signed_url("private/doro.png", DEFAULT_SIGNED_URL_TTL).await;
        assert_eq!(url, SIGNED_URL_FALLBACK);

        let err = cos
            .try_signed_url("private/doro.png", DEFAULT_SIGNED_URL_TTL)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn random_emoji_url_falls_back_on_bad_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/emojis/random"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "url": "x" })))
            .mount(&server)
            .await;

        assert_eq!(
            client_for(&server).random_emoji_url().await,
            RANDOM_URL_FALLBACK
        );
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn upload_sends_multipart_file() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/cos/upload-emoji"))
            .and(body_string_contains("name=\"file\""))
            .and(body_string_contains("filename=\"doro.png\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "imageUrl": "https://cdn.example.com/emojis/original/doro.png"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let url = client_for(&server)
            .upload_emoji(UploadFile::new("doro.png", b"not really a png".to_vec()))
            .await
            .expect("upload");
        assert_eq!(url, "https://cdn.example.com/emojis/original/doro.png");
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn upload_failure_is_upload_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(413))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .upload_emoji(UploadFile::new("doro.png", vec![0; 16]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Upload);
    }
}
