//! Temp-file-then-rename asset persistence.
//!
//! Bytes land in `<dest>.part` first and are renamed onto `dest` only after
//! the write is flushed, so a file at `dest` is always complete.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::constants::PARTIAL_SUFFIX;
use super::error::DownloadError;

/// Path of the in-progress file for `dest`.
pub(crate) fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(OsString::from).unwrap_or_default();
    name.push(".");
    name.push(PARTIAL_SUFFIX);
    dest.with_file_name(name)
}

/// Writes `bytes` to `dest` via a sibling temp file and an atomic rename.
///
/// On failure the temp file is removed and `dest` is left untouched.
pub(crate) async fn write_atomically(dest: &Path, bytes: &[u8]) -> Result<(), DownloadError> {
    let temp_path = partial_path(dest);

    let result = write_and_rename(&temp_path, dest, bytes).await;
    if result.is_err() {
        let _ = tokio::fs::remove_file(&temp_path).await;
    }
    result
}

/// Removes a `<dest>.part` left behind by an interrupted write, if any.
pub(crate) async fn discard_partial(dest: &Path) {
    let temp_path = partial_path(dest);
    match tokio::fs::remove_file(&temp_path).await {
        Ok(()) => debug!(path = %temp_path.display(), "removed stale partial file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %temp_path.display(), error = %e, "could not remove stale partial file"),
    }
}

async fn write_and_rename(temp_path: &Path, dest: &Path, bytes: &[u8]) -> Result<(), DownloadError> {
    let mut file = tokio::fs::File::create(temp_path)
        .await
        .map_err(|e| DownloadError::io(temp_path, e))?;
    file.write_all(bytes)
        .await
        .map_err(|e| DownloadError::io(temp_path, e))?;
    file.flush()
        .await
        .map_err(|e| DownloadError::io(temp_path, e))?;
    drop(file);

    tokio::fs::rename(temp_path, dest)
        .await
        .map_err(|e| DownloadError::io(dest, e))
}
