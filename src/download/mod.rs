//! Asset download engine.
//!
//! This module turns a list of [`crate::jobs::DownloadJob`]s into files on
//! disk with a fixed number of fetches in flight.
//!
//! # Features
//!
//! - Bounded concurrency (3 workers by default, at most 32)
//! - 404 treated as a per-job soft failure, everything else aborts the batch
//! - Temp file plus rename, so a destination file is never partial
//! - Configurable timeouts (30s connect, 5min read by default)
//! - Pluggable [`AssetFetcher`] for tests
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use emoji_downloader_core::download::{DownloadExecutor, HttpFetcher};
//! use emoji_downloader_core::progress::NoProgress;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let executor = DownloadExecutor::new(3)?;
//! let report = executor
//!     .execute(Vec::new(), Arc::new(HttpFetcher::new()?), Arc::new(NoProgress))
//!     .await?;
//! assert_eq!(report.total(), 0);
//! # Ok(())
//! # }
//! ```

mod client;
pub(crate) mod constants;
mod error;
mod executor;
mod persist;

pub use client::{AssetFetcher, HttpFetcher};
pub use constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_CONCURRENCY, MAX_CONCURRENCY, MIN_CONCURRENCY, READ_TIMEOUT_SECS,
};
pub use error::{DownloadError, ExecutorError};
pub use executor::{DownloadExecutor, ExecutionReport, JobOutcome, download_job};
