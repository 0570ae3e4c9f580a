use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while materializing a guild's directory and snapshot.
#[derive(Debug, Error)]
pub enum JobError {
    /// Creating the guild directory or writing `info.json` failed.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The path being written.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The guild record could not be serialized.
    #[error("failed to serialize snapshot for guild {guild_id}: {source}")]
    Snapshot {
        /// Guild whose record failed.
        guild_id: String,
        /// The serializer error.
        #[source]
        source: serde_json::Error,
    },
}

impl JobError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
