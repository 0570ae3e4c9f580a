use std::path::{Path, PathBuf};

/// One unit of work: fetch `source_url` into `dest_path`.
///
/// Immutable once built. Completion is never stored on the job; it is read
/// back from the filesystem by [`DownloadJob::is_done`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    description: String,
    source_url: String,
    dest_path: PathBuf,
}

impl DownloadJob {
    /// Creates a job.
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        source_url: impl Into<String>,
        dest_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            description: description.into(),
            source_url: source_url.into(),
            dest_path: dest_path.into(),
        }
    }

    /// Human label, `"<guild>:<asset>"`.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Fully resolved fetch location.
    #[must_use]
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Final on-disk location.
    #[must_use]
    pub fn dest_path(&self) -> &Path {
        &self.dest_path
    }

    /// Whether a regular file already exists at `dest_path`.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.dest_path.is_file()
    }
}
