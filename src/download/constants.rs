//! Constants for the download module (timeouts, worker pool bounds).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP request timeout (5 minutes, covers slow CDN edges).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Default number of simultaneous asset fetches.
pub const DEFAULT_CONCURRENCY: usize = 3;

/// Minimum allowed concurrency value.
pub const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
pub const MAX_CONCURRENCY: usize = 32;

/// Suffix of the temporary file an asset is written to before being renamed
/// onto its destination.
pub(crate) const PARTIAL_SUFFIX: &str = "part";
