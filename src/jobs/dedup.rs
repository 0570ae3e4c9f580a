use tracing::debug;

use super::job::DownloadJob;

/// Keeps only the jobs whose destination does not exist yet, preserving order.
///
/// Runs once between enumeration and execution so the remaining-work count
/// reported to the user is exact.
#[must_use]
pub fn pending_jobs(jobs: Vec<DownloadJob>) -> Vec<DownloadJob> {
    let total = jobs.len();
    let pending: Vec<DownloadJob> = jobs.into_iter().filter(|job| !job.is_done()).collect();
    debug!(total, pending = pending.len(), "filtered completed jobs");
    pending
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_pending_jobs_drops_jobs_with_existing_destination() {
        let temp_dir = TempDir::new().unwrap();
        let present = DownloadJob::new("g:a", "https://x/a", temp_dir.path().join("a.png"));
        let missing = DownloadJob::new("g:b", "https://x/b", temp_dir.path().join("b.png"));
        std::fs::write(present.dest_path(), b"png").unwrap();

        let pending = pending_jobs(vec![present, missing.clone()]);

        assert_eq!(pending, vec![missing]);
    }

    #[test]
    fn test_pending_jobs_preserves_order() {
        let temp_dir = TempDir::new().unwrap();
        let jobs: Vec<DownloadJob> = (0..5)
            .map(|i| {
                DownloadJob::new(
                    format!("g:{i}"),
                    format!("https://x/{i}"),
                    temp_dir.path().join(format!("{i}.png")),
                )
            })
            .collect();
        std::fs::write(jobs[2].dest_path(), b"png").unwrap();

        let pending = pending_jobs(jobs);

        let labels: Vec<&str> = pending.iter().map(DownloadJob::description).collect();
        assert_eq!(labels, ["g:0", "g:1", "g:3", "g:4"]);
    }

    #[test]
    fn test_pending_jobs_empty_input() {
        assert!(pending_jobs(Vec::new()).is_empty());
    }
}
