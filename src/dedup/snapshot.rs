//! Durable collaborator for the dedup set.
//!
//! [`FileSnapshotStore`] writes `rkyv` bytes to a temp file and renames it over the
//! previous snapshot, so a crash mid-write leaves the old snapshot intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rkyv::rancor::Error as RkyvError;
use rkyv::util::AlignedVec;
use rkyv::{Archive, Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use super::error::{SnapshotError, SnapshotResult};

/// Default snapshot filename.
pub const DEFAULT_SNAPSHOT_FILENAME: &str = "dedup.rkyv";

const TEMP_SUFFIX: &str = "tmp";

/// Point-in-time copy of the dedup set.
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Clone, Default)]
pub struct DedupSnapshot {
    /// Raw 16-byte event ids.
    pub ids: Vec<[u8; 16]>,
    /// When the snapshot was taken (unix millis).
    pub taken_at_unix_ms: i64,
}

impl DedupSnapshot {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[async_trait]
/// Persists and restores dedup snapshots.
pub trait SnapshotStore: Send + Sync {
    /// Replaces the stored snapshot with `snapshot`.
    async fn save(&self, snapshot: &DedupSnapshot) -> SnapshotResult<()>;
    /// Returns the stored snapshot, or `None` if nothing has been saved yet.
    async fn load(&self) -> SnapshotResult<Option<DedupSnapshot>>;
}

/// Store used when no snapshot location is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSnapshotStore;

#[async_trait]
impl SnapshotStore for NoopSnapshotStore {
    async fn save(&self, _snapshot: &DedupSnapshot) -> SnapshotResult<()> {
        Ok(())
    }

    async fn load(&self) -> SnapshotResult<Option<DedupSnapshot>> {
        Ok(None)
    }
}

/// Single-file snapshot store on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DEFAULT_SNAPSHOT_FILENAME.into());
        name.push(".");
        name.push(TEMP_SUFFIX);
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn save(&self, snapshot: &DedupSnapshot) -> SnapshotResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let bytes = rkyv::to_bytes::<RkyvError>(snapshot)
            .map_err(|e| SnapshotError::Serialization(e.to_string()))?;

        let temp_path = self.temp_path();
        {
            let mut file = tokio::fs::File::create(&temp_path).await?;
            file.write_all(&bytes).await?;
            file.sync_all().await?;
        }

        tokio::fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }

    async fn load(&self) -> SnapshotResult<Option<DedupSnapshot>> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut aligned = AlignedVec::<16>::with_capacity(data.len());
        aligned.extend_from_slice(&data);

        let snapshot = rkyv::from_bytes::<DedupSnapshot, RkyvError>(&aligned).map_err(|e| {
            SnapshotError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(Some(snapshot))
    }
}
