//! Bounded concurrent executor for download jobs.
//!
//! This module provides the [`DownloadExecutor`], which drains a list of
//! [`DownloadJob`]s with at most `concurrency` fetches in flight.
//!
//! # Failure model
//!
//! - A 404 is a soft failure: the job is reported as [`JobOutcome::NotFound`]
//!   and the batch continues.
//! - Any other failure is fatal: no further job is started, jobs still in
//!   flight are aborted rather than awaited, and the error is returned.
//!   Files written before the failure stay on disk.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use emoji_downloader_core::download::{DownloadExecutor, HttpFetcher};
//! use emoji_downloader_core::jobs::DownloadJob;
//! use emoji_downloader_core::progress::NoProgress;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let executor = DownloadExecutor::new(3)?;
//! let jobs = vec![DownloadJob::new(
//!     "Guild:wave",
//!     "https://cdn.discordapp.com/emojis/1.gif?v=1",
//!     "download/Guild/emojis/wave.gif",
//! )];
//! let report = executor
//!     .execute(jobs, Arc::new(HttpFetcher::new()?), Arc::new(NoProgress))
//!     .await?;
//! println!("downloaded {}", report.downloaded());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

use super::client::AssetFetcher;
use super::constants::{DEFAULT_CONCURRENCY, MAX_CONCURRENCY, MIN_CONCURRENCY};
use super::error::{DownloadError, ExecutorError};
use super::persist::{discard_partial, write_atomically};
use crate::jobs::DownloadJob;
use crate::progress::ProgressSink;

/// Result of one job that did not abort the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// Fetched and written to its destination.
    Downloaded,
    /// Destination already existed when the job was picked up; no request made.
    AlreadyPresent,
    /// The CDN answered 404.
    NotFound,
}

impl JobOutcome {
    /// Whether the job counts as successful.
    #[must_use]
    pub fn is_ok(self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// Summary of a completed batch.
#[derive(Debug, Clone, Default)]
pub struct ExecutionReport {
    downloaded: usize,
    already_present: usize,
    not_found: Vec<DownloadJob>,
}

impl ExecutionReport {
    /// Jobs fetched and written during this batch.
    #[must_use]
    pub fn downloaded(&self) -> usize {
        self.downloaded
    }

    /// Jobs that found their destination already present.
    #[must_use]
    pub fn already_present(&self) -> usize {
        self.already_present
    }

    /// Jobs whose asset was not found.
    #[must_use]
    pub fn not_found(&self) -> &[DownloadJob] {
        &self.not_found
    }

    /// Jobs that ended successfully (downloaded or already present).
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.downloaded + self.already_present
    }

    /// Jobs that ended not-ok.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.not_found.len()
    }

    /// All jobs processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.succeeded() + self.failed()
    }

    fn record(&mut self, job: DownloadJob, outcome: JobOutcome) {
        match outcome {
            JobOutcome::Downloaded => self.downloaded += 1,
            JobOutcome::AlreadyPresent => self.already_present += 1,
            JobOutcome::NotFound => self.not_found.push(job),
        }
    }
}

/// Fixed-size worker pool for download jobs.
///
/// # Concurrency Model
///
/// - Each job runs in its own Tokio task inside a [`JoinSet`]
/// - The control loop never holds more than `concurrency` tasks in the set
/// - Results are consumed in completion order, not submission order
/// - The next job is only spawned after the previous completion was checked,
///   so nothing new starts once a fatal error has been observed
#[derive(Debug, Clone)]
pub struct DownloadExecutor {
    concurrency: usize,
}

impl Default for DownloadExecutor {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl DownloadExecutor {
    /// Creates an executor with the given in-flight bound.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-32).
    ///
    /// # Example
    ///
    /// ```
    /// use emoji_downloader_core::download::DownloadExecutor;
    ///
    /// let executor = DownloadExecutor::new(3).unwrap();
    /// assert_eq!(executor.concurrency(), 3);
    /// assert!(DownloadExecutor::new(0).is_err());
    /// ```
    #[instrument(level = "debug")]
    pub fn new(concurrency: usize) -> Result<Self, ExecutorError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(ExecutorError::InvalidConcurrency { value: concurrency });
        }
        debug!(concurrency, "creating download executor");
        Ok(Self { concurrency })
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Runs every job, returning once all have finished or one failed fatally.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::Fatal`] for the first non-404 failure and
    /// [`ExecutorError::TaskPanicked`] if a worker panics. In both cases jobs
    /// still in flight are aborted and jobs not yet started are dropped.
    #[instrument(skip_all, fields(jobs = jobs.len(), concurrency = self.concurrency))]
    pub async fn execute(
        &self,
        jobs: Vec<DownloadJob>,
        fetcher: Arc<dyn AssetFetcher>,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<ExecutionReport, ExecutorError> {
        progress.execution_started(jobs.len());
        let result = self.drain(jobs, fetcher, progress.as_ref()).await;
        progress.execution_finished();

        if let Ok(report) = &result {
            info!(
                downloaded = report.downloaded(),
                already_present = report.already_present(),
                not_found = report.failed(),
                total = report.total(),
                "download batch complete"
            );
        }
        result
    }

    async fn drain(
        &self,
        jobs: Vec<DownloadJob>,
        fetcher: Arc<dyn AssetFetcher>,
        progress: &dyn ProgressSink,
    ) -> Result<ExecutionReport, ExecutorError> {
        let mut queue = jobs.into_iter();
        let mut in_flight = JoinSet::new();
        let mut report = ExecutionReport::default();

        loop {
            while in_flight.len() < self.concurrency {
                let Some(job) = queue.next() else {
                    break;
                };
                progress.job_started(&job);
                let fetcher = Arc::clone(&fetcher);
                in_flight.spawn(async move {
                    let result = download_job(&job, fetcher.as_ref()).await;
                    (job, result)
                });
            }

            let Some(joined) = in_flight.join_next().await else {
                break;
            };
            let (job, result) = joined.map_err(|e| ExecutorError::TaskPanicked {
                message: e.to_string(),
            })?;

            match result {
                Ok(outcome) => {
                    progress.job_finished(&job, outcome);
                    report.record(job, outcome);
                }
                Err(source) => {
                    let abandoned = in_flight.len();
                    in_flight.abort_all();
                    error!(
                        job = job.description(),
                        error = %source,
                        abandoned,
                        not_started = queue.len(),
                        "fatal download error, aborting batch"
                    );
                    return Err(ExecutorError::Fatal {
                        job: job.description().to_string(),
                        completed: report.succeeded(),
                        source,
                    });
                }
            }
        }

        Ok(report)
    }
}

/// Runs a single job: re-check, fetch, classify, persist.
///
/// # Errors
///
/// Returns every [`DownloadError`] except `NotFound`, which is logged and
/// reported as [`JobOutcome::NotFound`].
#[instrument(skip(job, fetcher), fields(job = job.description()))]
pub async fn download_job(
    job: &DownloadJob,
    fetcher: &dyn AssetFetcher,
) -> Result<JobOutcome, DownloadError> {
    if job.is_done() {
        debug!(path = %job.dest_path().display(), "already present, skipping");
        return Ok(JobOutcome::AlreadyPresent);
    }

    if let Some(parent) = job.dest_path().parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DownloadError::io(parent, e))?;
    }

    match fetcher.fetch(job.source_url()).await {
        Ok(bytes) => {
            write_atomically(job.dest_path(), &bytes).await?;
            debug!(path = %job.dest_path().display(), bytes = bytes.len(), "download complete");
            Ok(JobOutcome::Downloaded)
        }
        Err(error) if error.is_soft() => {
            warn!(job = job.description(), url = job.source_url(), "Not found");
            discard_partial(job.dest_path()).await;
            Ok(JobOutcome::NotFound)
        }
        Err(error) => Err(error),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use crate::progress::NoProgress;

    /// Fetcher answering from a script and recording concurrency.
    #[derive(Default)]
    struct ScriptedFetcher {
        statuses: HashMap<String, u16>,
        delays: HashMap<String, Duration>,
        default_delay: Duration,
        calls: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl ScriptedFetcher {
        fn with_status(mut self, url: &str, status: u16) -> Self {
            self.statuses.insert(url.to_string(), status);
            self
        }

        fn with_delay(mut self, url: &str, delay: Duration) -> Self {
            self.delays.insert(url.to_string(), delay);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AssetFetcher for ScriptedFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
            self.calls.lock().unwrap().push(url.to_string());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let delay = self.delays.get(url).copied().unwrap_or(self.default_delay);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match self.statuses.get(url) {
                Some(&status) => Err(DownloadError::from_status(url, status)),
                None => Ok(format!("body of {url}").into_bytes()),
            }
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        started: AtomicUsize,
        finished: AtomicUsize,
        total: AtomicUsize,
    }

    impl ProgressSink for RecordingProgress {
        fn execution_started(&self, remaining: usize) {
            self.total.store(remaining, Ordering::SeqCst);
        }

        fn job_started(&self, _job: &DownloadJob) {
            self.started.fetch_add(1, Ordering::SeqCst);
        }

        fn job_finished(&self, _job: &DownloadJob, _outcome: JobOutcome) {
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn jobs(dir: &TempDir, names: &[&str]) -> Vec<DownloadJob> {
        names
            .iter()
            .map(|name| {
                DownloadJob::new(
                    format!("G:{name}"),
                    format!("https://cdn.test/emojis/{name}.png?v=1"),
                    dir.path().join("G/emojis").join(format!("{name}.png")),
                )
            })
            .collect()
    }

    fn url(name: &str) -> String {
        format!("https://cdn.test/emojis/{name}.png?v=1")
    }

    #[test]
    fn test_new_rejects_out_of_range_concurrency() {
        assert!(matches!(
            DownloadExecutor::new(0),
            Err(ExecutorError::InvalidConcurrency { value: 0 })
        ));
        assert!(DownloadExecutor::new(MAX_CONCURRENCY + 1).is_err());
        assert_eq!(DownloadExecutor::new(MAX_CONCURRENCY).unwrap().concurrency(), MAX_CONCURRENCY);
    }

    #[test]
    fn test_default_concurrency_is_three() {
        assert_eq!(DownloadExecutor::default().concurrency(), 3);
    }

    #[tokio::test]
    async fn test_execute_downloads_every_job_and_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let work = jobs(&temp_dir, &["a", "b", "c"]);
        let fetcher = Arc::new(ScriptedFetcher::default());

        let report = DownloadExecutor::default()
            .execute(work.clone(), fetcher.clone(), Arc::new(NoProgress))
            .await
            .unwrap();

        assert_eq!(report.downloaded(), 3);
        assert_eq!(report.failed(), 0);
        for job in &work {
            let body = std::fs::read_to_string(job.dest_path()).unwrap();
            assert_eq!(body, format!("body of {}", job.source_url()));
        }
    }

    #[tokio::test]
    async fn test_not_found_is_isolated_to_its_job() {
        let temp_dir = TempDir::new().unwrap();
        let work = jobs(&temp_dir, &["a", "gone", "c", "d"]);
        let fetcher = Arc::new(ScriptedFetcher::default().with_status(&url("gone"), 404));

        let report = DownloadExecutor::new(2)
            .unwrap()
            .execute(work.clone(), fetcher.clone(), Arc::new(NoProgress))
            .await
            .unwrap();

        assert_eq!(report.downloaded(), 3);
        assert_eq!(report.not_found(), &work[1..2]);
        assert!(!work[1].dest_path().exists());
        for job in [&work[0], &work[2], &work[3]] {
            assert!(job.is_done(), "{} should be on disk", job.description());
        }
    }

    #[tokio::test]
    async fn test_not_found_removes_partial_file_from_interrupted_run() {
        let temp_dir = TempDir::new().unwrap();
        let work = jobs(&temp_dir, &["gone"]);
        let partial = temp_dir.path().join("G/emojis/gone.png.part");
        std::fs::create_dir_all(partial.parent().unwrap()).unwrap();
        std::fs::write(&partial, b"torn").unwrap();
        let fetcher = ScriptedFetcher::default().with_status(&url("gone"), 404);

        let outcome = download_job(&work[0], &fetcher).await.unwrap();

        assert_eq!(outcome, JobOutcome::NotFound);
        assert!(!partial.exists());
        assert!(!work[0].dest_path().exists());
    }

    #[tokio::test]
    async fn test_fatal_error_stops_scheduling_and_keeps_completed_files() {
        let temp_dir = TempDir::new().unwrap();
        let work = jobs(&temp_dir, &["a", "b", "boom", "d", "e"]);
        let fetcher = Arc::new(ScriptedFetcher::default().with_status(&url("boom"), 500));

        let result = DownloadExecutor::new(1)
            .unwrap()
            .execute(work.clone(), fetcher.clone(), Arc::new(NoProgress))
            .await;

        match result {
            Err(ExecutorError::Fatal {
                job,
                completed,
                source: DownloadError::HttpStatus { status: 500, .. },
            }) => {
                assert_eq!(job, "G:boom");
                assert_eq!(completed, 2);
            }
            other => panic!("expected fatal HTTP 500, got {other:?}"),
        }
        assert!(work[0].is_done());
        assert!(work[1].is_done());
        assert!(!work[3].is_done());
        assert!(!work[4].is_done());
        assert_eq!(fetcher.calls(), vec![url("a"), url("b"), url("boom")]);
    }

    #[tokio::test]
    async fn test_fatal_error_abandons_in_flight_jobs() {
        let temp_dir = TempDir::new().unwrap();
        let work = jobs(&temp_dir, &["boom", "slow"]);
        let fetcher = Arc::new(
            ScriptedFetcher::default()
                .with_status(&url("boom"), 503)
                .with_delay(&url("slow"), Duration::from_millis(200)),
        );

        let result = DownloadExecutor::new(2)
            .unwrap()
            .execute(work.clone(), fetcher.clone(), Arc::new(NoProgress))
            .await;
        assert!(matches!(result, Err(ExecutorError::Fatal { .. })));

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(!work[1].dest_path().exists(), "aborted job must not write its file");
    }

    #[tokio::test]
    async fn test_in_flight_fetches_never_exceed_concurrency() {
        let temp_dir = TempDir::new().unwrap();
        let names: Vec<String> = (0..20).map(|i| format!("e{i}")).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let work = jobs(&temp_dir, &name_refs);
        let fetcher = Arc::new(ScriptedFetcher {
            default_delay: Duration::from_millis(20),
            ..ScriptedFetcher::default()
        });

        let report = DownloadExecutor::new(3)
            .unwrap()
            .execute(work, fetcher.clone(), Arc::new(NoProgress))
            .await
            .unwrap();

        assert_eq!(report.downloaded(), 20);
        assert_eq!(fetcher.max_in_flight.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_job_completed_elsewhere_is_skipped_without_fetch() {
        let temp_dir = TempDir::new().unwrap();
        let work = jobs(&temp_dir, &["a", "b"]);
        std::fs::create_dir_all(work[0].dest_path().parent().unwrap()).unwrap();
        std::fs::write(work[0].dest_path(), b"written by another process").unwrap();
        let fetcher = Arc::new(ScriptedFetcher::default());

        let report = DownloadExecutor::default()
            .execute(work.clone(), fetcher.clone(), Arc::new(NoProgress))
            .await
            .unwrap();

        assert_eq!(report.already_present(), 1);
        assert_eq!(report.downloaded(), 1);
        assert_eq!(fetcher.calls(), vec![url("b")]);
        assert_eq!(
            std::fs::read(work[0].dest_path()).unwrap(),
            b"written by another process"
        );
    }

    #[tokio::test]
    async fn test_progress_sink_sees_every_job() {
        let temp_dir = TempDir::new().unwrap();
        let work = jobs(&temp_dir, &["a", "gone", "c"]);
        let fetcher = Arc::new(ScriptedFetcher::default().with_status(&url("gone"), 404));
        let progress = Arc::new(RecordingProgress::default());

        DownloadExecutor::default()
            .execute(work, fetcher, progress.clone())
            .await
            .unwrap();

        assert_eq!(progress.total.load(Ordering::SeqCst), 3);
        assert_eq!(progress.started.load(Ordering::SeqCst), 3);
        assert_eq!(progress.finished.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_execute_empty_job_list_returns_empty_report() {
        let report = DownloadExecutor::default()
            .execute(Vec::new(), Arc::new(ScriptedFetcher::default()), Arc::new(NoProgress))
            .await
            .unwrap();
        assert_eq!(report.total(), 0);
    }

    #[test]
    fn test_job_outcome_is_ok() {
        assert!(JobOutcome::Downloaded.is_ok());
        assert!(JobOutcome::AlreadyPresent.is_ok());
        assert!(!JobOutcome::NotFound.is_ok());
    }
}
