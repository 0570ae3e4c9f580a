//! Error types for the download module.
//!
//! This module defines structured errors for asset fetches and for the
//! executor that drives them. Only [`DownloadError::NotFound`] is a soft
//! failure; everything else aborts the batch.

use std::path::PathBuf;

use thiserror::Error;

use super::constants::{MAX_CONCURRENCY, MIN_CONCURRENCY};

/// Errors that can occur while fetching or persisting one asset.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The CDN answered 404; the asset no longer exists.
    #[error("not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response other than 404.
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error while creating directories or writing the asset.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The job's source URL is malformed.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },
}

impl DownloadError {
    /// Creates a network error, promoting timeouts to [`DownloadError::Timeout`].
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }

    /// Creates an error from a non-success status; 404 becomes [`DownloadError::NotFound`].
    pub fn from_status(url: impl Into<String>, status: u16) -> Self {
        let url = url.into();
        if status == 404 {
            Self::NotFound { url }
        } else {
            Self::HttpStatus { url, status }
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Whether this failure is contained to its own job.
    #[must_use]
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Error type for executor operations.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// A job failed in a way that aborts the whole batch.
    #[error("download of {job} failed, aborting batch ({completed} done before abort): {source}")]
    Fatal {
        /// Description of the failing job.
        job: String,
        /// Jobs that finished successfully before the abort.
        completed: usize,
        /// The underlying failure.
        #[source]
        source: DownloadError,
    },

    /// A worker task panicked.
    #[error("download task panicked: {message}")]
    TaskPanicked {
        /// Panic payload rendered by the runtime.
        message: String,
    },
}
