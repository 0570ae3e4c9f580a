//! Emoji Downloader Core Library
//!
//! This library provides the core functionality for the emoji downloader,
//! which archives the custom emojis and stickers of Discord guilds into a
//! deterministic directory tree that can be re-synced at any time.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`catalog`] - Guild records and the lazy guild enumerator
//! - [`jobs`] - Download job construction, name sanitization and dedup
//! - [`download`] - Asset fetching and the bounded concurrent executor
//! - [`progress`] - Progress reporting interface consumed by the pipeline
//! - [`pipeline`] - Enumerate, build, filter and execute in one call

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod download;
pub mod jobs;
pub mod pipeline;
pub mod progress;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use catalog::{CatalogClient, CatalogError, Emoji, Guild, GuildEnumerator, GuildSelection, Sticker};
pub use download::{
    AssetFetcher, DEFAULT_CONCURRENCY, DownloadError, DownloadExecutor, ExecutionReport,
    ExecutorError, HttpFetcher, JobOutcome, MAX_CONCURRENCY,
};
pub use jobs::{AssetUrls, DownloadJob, JobBuilder, JobError, clean_name_for_fs, pending_jobs};
pub use pipeline::{PipelineError, PipelineSummary, collect_jobs, run};
pub use progress::{NoProgress, ProgressSink, progress_label};
