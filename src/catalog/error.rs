//! Error types for the catalog module.

use thiserror::Error;

/// Errors raised while listing or fetching guild records.
///
/// Every variant is fatal for enumeration: the run stops before any asset
/// is downloaded.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The catalog URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The request timed out.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The catalog URL that timed out.
        url: String,
    },

    /// The service answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The catalog URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The response body was not the JSON shape we expected.
    #[error("malformed catalog response from {url}: {reason}")]
    Malformed {
        /// The catalog URL whose body could not be interpreted.
        url: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The caller token cannot be sent as an HTTP header value.
    #[error("user token contains characters that are not valid in an HTTP header")]
    InvalidToken,

    /// The configured API base URL does not parse.
    #[error("invalid catalog base URL: {url}")]
    InvalidBaseUrl {
        /// The rejected base URL.
        url: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build catalog HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl CatalogError {
    /// Creates a network error, promoting timeouts to [`CatalogError::Timeout`].
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a malformed-response error.
    pub fn malformed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
