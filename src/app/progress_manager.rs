//! Terminal progress UI (spinner, then bar) for sync runs.

use std::time::Duration;

use emoji_downloader_core::download::JobOutcome;
use emoji_downloader_core::jobs::DownloadJob;
use emoji_downloader_core::progress::{ProgressSink, progress_label};
use indicatif::{ProgressBar, ProgressStyle};

const SPINNER_TEMPLATE: &str = "{spinner} {msg}";
const BAR_TEMPLATE: &str = "{msg} [{bar:40}] {pos}/{len} ({eta})";

/// Returns true when the UI should be drawn.
pub(crate) fn should_show_progress(stderr_is_terminal: bool, quiet: bool, dumb_terminal: bool) -> bool {
    stderr_is_terminal && !quiet && !dumb_terminal
}

pub(crate) fn is_dumb_terminal() -> bool {
    std::env::var("TERM")
        .map(|value| value.eq_ignore_ascii_case("dumb"))
        .unwrap_or(false)
}

/// [`ProgressSink`] drawing to stderr with indicatif.
///
/// A spinner counts jobs while guilds are enumerated; it turns into a bar
/// sized to the remaining work once execution starts.
#[derive(Debug)]
pub(crate) struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    pub(crate) fn new(visible: bool) -> Self {
        let bar = if visible {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        bar.set_style(
            ProgressStyle::with_template(SPINNER_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        if visible {
            bar.enable_steady_tick(Duration::from_millis(100));
        }
        Self { bar }
    }

    /// Clears whatever is still drawn, e.g. when nothing had to be downloaded.
    pub(crate) fn finish(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

impl ProgressSink for TerminalProgress {
    fn enumeration_progress(&self, guilds_fetched: usize, guilds_total: Option<usize>, jobs: usize) {
        let guilds = match guilds_total {
            Some(total) => format!("[{guilds_fetched}/{total}]"),
            None => format!("[{guilds_fetched}]"),
        };
        self.bar.set_message(format!("{guilds} {jobs} jobs so far..."));
    }

    fn enumeration_finished(&self, jobs: usize) {
        self.bar.set_message(format!("{jobs} jobs found"));
    }

    fn execution_started(&self, remaining: usize) {
        self.bar.disable_steady_tick();
        self.bar.set_style(
            ProgressStyle::with_template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        self.bar.set_length(u64::try_from(remaining).unwrap_or(u64::MAX));
        self.bar.set_position(0);
        self.bar.set_message(progress_label(""));
    }

    fn job_started(&self, job: &DownloadJob) {
        self.bar.set_message(progress_label(job.description()));
    }

    fn job_finished(&self, _job: &DownloadJob, _outcome: JobOutcome) {
        self.bar.inc(1);
    }

    fn execution_finished(&self) {
        self.bar.finish();
    }
}
