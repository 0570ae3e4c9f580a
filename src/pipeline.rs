//! End-to-end sync: enumerate, build, filter, execute.
//!
//! Enumeration and job building finish completely before any download
//! starts, so the remaining-work count is known up front.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument};

use crate::catalog::{CatalogError, GuildEnumerator};
use crate::download::{AssetFetcher, DownloadExecutor, ExecutionReport, ExecutorError};
use crate::jobs::{DownloadJob, JobBuilder, JobError, pending_jobs};
use crate::progress::ProgressSink;

/// Failure of one pipeline phase.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Fetching guild metadata failed.
    #[error("guild enumeration failed")]
    Catalog(#[from] CatalogError),

    /// Creating a guild directory or snapshot failed.
    #[error("job construction failed")]
    Jobs(#[from] JobError),

    /// The download batch aborted.
    #[error("download aborted")]
    Executor(#[from] ExecutorError),
}

/// Counts gathered across one sync run.
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    /// Guilds enumerated.
    pub guilds: usize,
    /// Jobs discovered across all guilds.
    pub discovered: usize,
    /// Jobs left after dropping those already on disk.
    pub remaining: usize,
    /// Executor report for the remaining jobs.
    pub report: ExecutionReport,
}

impl PipelineSummary {
    /// Whether every remaining asset was fetched.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.report.failed() == 0
    }
}

/// Drains the enumerator, expanding each guild into jobs.
///
/// Guild directories and snapshots are written as each guild arrives.
///
/// # Errors
///
/// Returns the first catalog or filesystem error; guilds processed before it
/// keep their directories and snapshots.
pub async fn collect_jobs(
    enumerator: &mut GuildEnumerator,
    builder: &mut JobBuilder,
    progress: &dyn ProgressSink,
) -> Result<Vec<DownloadJob>, PipelineError> {
    let mut jobs = Vec::new();
    while let Some(guild) = enumerator.next_guild().await? {
        jobs.extend(builder.build(&guild)?);
        progress.enumeration_progress(enumerator.fetched(), enumerator.total(), jobs.len());
    }
    progress.enumeration_finished(jobs.len());
    Ok(jobs)
}

/// Runs a full sync.
///
/// # Errors
///
/// Returns [`PipelineError`] for enumeration, filesystem or fatal download
/// failures. Assets that were not found are reported in the summary instead.
#[instrument(skip_all, fields(root = %builder.root().display()))]
pub async fn run(
    mut enumerator: GuildEnumerator,
    mut builder: JobBuilder,
    executor: &DownloadExecutor,
    fetcher: Arc<dyn AssetFetcher>,
    progress: Arc<dyn ProgressSink>,
) -> Result<PipelineSummary, PipelineError> {
    let jobs = collect_jobs(&mut enumerator, &mut builder, progress.as_ref()).await?;
    let discovered = jobs.len();
    info!("{discovered} download jobs");

    let pending = pending_jobs(jobs);
    let remaining = pending.len();
    info!("{remaining} jobs to do");

    let report = if pending.is_empty() {
        ExecutionReport::default()
    } else {
        executor.execute(pending, fetcher, progress).await?
    };

    Ok(PipelineSummary {
        guilds: enumerator.fetched(),
        discovered,
        remaining,
        report,
    })
}
