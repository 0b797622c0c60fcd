//! Seen-set of event ids used to reject re-delivered events.
//!
//! The set lives in memory and grows for the lifetime of the process. A
//! [`SnapshotStore`] can persist it on a timer ([`run_snapshot_worker`]) and repopulate it
//! on startup ([`DedupCache::restore`]). Both directions are best-effort.

pub mod cache;
pub mod error;
pub mod snapshot;
pub mod worker;


pub use cache::{DedupCache, DedupCacheHandle};
pub use error::{SnapshotError, SnapshotResult};
pub use snapshot::{
    DEFAULT_SNAPSHOT_FILENAME, DedupSnapshot, FileSnapshotStore, NoopSnapshotStore,
    SnapshotStore,
};
pub use worker::run_snapshot_worker;
