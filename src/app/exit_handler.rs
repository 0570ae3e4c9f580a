//! Exit code logic for the emoji-downloader process.
//!
//! Single responsibility: map the executor report to the process exit outcome.

use emoji_downloader_core::ExecutionReport;

use crate::ProcessExit;

/// Determines the process exit outcome of a run that finished without a fatal error.
pub(crate) fn determine_exit_outcome(report: &ExecutionReport) -> ProcessExit {
    if report.failed() == 0 {
        ProcessExit::Success
    } else {
        ProcessExit::Partial
    }
}
