//! Errors raised while fetching gallery data.

use gallery_core::GalleryError;
use reqwest::StatusCode;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Broad classification of a [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failure or non-success HTTP status.
    Network,
    /// The response body did not have the expected shape.
    Parse,
    /// Uploading an image failed.
    Upload,
    /// Invalid configuration or arguments.
    Config,
    /// A custom fetcher failed.
    Custom,
}

/// Errors that can occur when fetching gallery data.
#[derive(Debug, Error)]
pub enum ClientError {
    /// An endpoint URL could not be parsed or resolved.
    #[error("invalid gallery URL: {0}")]
    InvalidUrl(String),
    /// A configured request header is not a valid HTTP header.
    #[error("invalid request header: {0}")]
    InvalidHeader(String),
    /// HTTP layer failed (connection, timeout, etc.).
    #[error("gallery HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("gallery API request failed: {status}")]
    Status {
        /// Status returned by the server.
        status: StatusCode,
    },
    /// JSON parsing failed.
    #[error("failed to parse gallery payload: {0}")]
    Parse(#[from] serde_json::Error),
    /// Uploading an image failed.
    #[error("upload failed, please retry: {0}")]
    Upload(String),
    /// Request arguments or configuration were rejected.
    #[error(transparent)]
    Gallery(#[from] GalleryError),
    /// A custom fetcher reported an error.
    #[error("custom fetcher failed: {0}")]
    Custom(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ClientError {
    /// Wrap an arbitrary error raised by a custom fetcher.
    pub fn custom(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Custom(err.into())
    }

    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(err) if err.is_decode() => ErrorKind::Parse,
            Self::Http(_) | Self::Status { .. } => ErrorKind::Network,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Upload(_) => ErrorKind::Upload,
            Self::InvalidUrl(_) | Self::InvalidHeader(_) | Self::Gallery(_) => ErrorKind::Config,
            Self::Custom(_) => ErrorKind::Custom,
        }
    }

    /// HTTP status, if the server answered with one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status } => Some(*status),
            Self::Http(err) => err.status(),
            _ => None,
        }
    }
}
