use std::path::PathBuf;

use thiserror::Error;

/// Errors from persisting or restoring the dedup set.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("snapshot at {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;
