//! Progress reporting interface.
//!
//! The pipeline and executor report through an explicit [`ProgressSink`]
//! handed to them by the caller. Sinks are observers only: nothing in the
//! core depends on their state, and every method has a no-op default.

use crate::download::JobOutcome;
use crate::jobs::DownloadJob;

/// Width of the job label shown next to the progress bar.
pub const LABEL_WIDTH: usize = 30;

/// Receives progress notifications. Called from the control task and from
/// worker tasks, hence `Send + Sync`.
pub trait ProgressSink: Send + Sync {
    /// A guild was fetched and expanded into jobs.
    fn enumeration_progress(&self, _guilds_fetched: usize, _guilds_total: Option<usize>, _jobs: usize) {}

    /// Enumeration completed with `jobs` jobs discovered.
    fn enumeration_finished(&self, _jobs: usize) {}

    /// Execution is starting with `remaining` jobs.
    fn execution_started(&self, _remaining: usize) {}

    /// A job entered the worker pool.
    fn job_started(&self, _job: &DownloadJob) {}

    /// A job left the worker pool without a fatal error.
    fn job_finished(&self, _job: &DownloadJob, _outcome: JobOutcome) {}

    /// Execution ended, successfully or not.
    fn execution_finished(&self) {}
}

/// Sink that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {}

/// Fixed-width label for a job description: truncated to [`LABEL_WIDTH`]
/// characters and right-padded with spaces.
#[must_use]
pub fn progress_label(description: &str) -> String {
    let truncated: String = description.chars().take(LABEL_WIDTH).collect();
    format!("{truncated:<LABEL_WIDTH$}")
}
