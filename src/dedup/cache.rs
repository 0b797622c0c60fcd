use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::info;
use uuid::Uuid;

use super::error::SnapshotResult;
use super::snapshot::{DedupSnapshot, SnapshotStore};

/// Set of admitted event ids.
///
/// Reads take the shared lock; only inserts take it exclusively. There is no eviction.
#[derive(Default)]
pub struct DedupCache {
    seen: RwLock<HashSet<Uuid>>,
}

impl DedupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `id` as seen. Marking twice is the same as marking once.
    #[inline]
    pub fn mark(&self, id: Uuid) {
        self.seen.write().insert(id);
    }

    /// Records `id` and returns `true` if it was not already marked.
    #[inline]
    pub fn try_mark(&self, id: Uuid) -> bool {
        self.seen.write().insert(id)
    }

    /// Returns `true` if `id` has been marked.
    #[inline]
    pub fn is_marked(&self, id: &Uuid) -> bool {
        self.seen.read().contains(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.seen.read().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seen.read().is_empty()
    }

    /// Copies the current set into a snapshot.
    pub fn snapshot(&self) -> DedupSnapshot {
        let ids = self.seen.read().iter().map(|id| *id.as_bytes()).collect();
        DedupSnapshot {
            ids,
            taken_at_unix_ms: Utc::now().timestamp_millis(),
        }
    }

    /// Merges the ids from `snapshot` into the set. Returns how many were new.
    pub fn merge(&self, snapshot: &DedupSnapshot) -> usize {
        let mut seen = self.seen.write();
        let before = seen.len();
        seen.extend(snapshot.ids.iter().map(|bytes| Uuid::from_bytes(*bytes)));
        seen.len() - before
    }

    /// Loads the latest snapshot from `store` and merges it.
    ///
    /// On error the set is left untouched.
    pub async fn restore(&self, store: &dyn SnapshotStore) -> SnapshotResult<usize> {
        let Some(snapshot) = store.load().await? else {
            info!("no dedup snapshot found, starting empty");
            return Ok(0);
        };

        let restored = self.merge(&snapshot);
        info!(
            restored,
            taken_at_unix_ms = snapshot.taken_at_unix_ms,
            "dedup cache restored"
        );
        Ok(restored)
    }
}

impl std::fmt::Debug for DedupCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DedupCache")
            .field("entries", &self.len())
            .finish()
    }
}

#[derive(Clone, Default)]
/// Shared handle to a [`DedupCache`].
pub struct DedupCacheHandle {
    inner: Arc<DedupCache>,
}

impl DedupCacheHandle {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn mark(&self, id: Uuid) {
        self.inner.mark(id)
    }

    #[inline]
    pub fn try_mark(&self, id: Uuid) -> bool {
        self.inner.try_mark(id)
    }

    #[inline]
    pub fn is_marked(&self, id: &Uuid) -> bool {
        self.inner.is_marked(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[inline]
    pub fn snapshot(&self) -> DedupSnapshot {
        self.inner.snapshot()
    }

    pub async fn restore(&self, store: &dyn SnapshotStore) -> SnapshotResult<usize> {
        self.inner.restore(store).await
    }
}

impl std::fmt::Debug for DedupCacheHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DedupCacheHandle")
            .field("strong_count", &Arc::strong_count(&self.inner))
            .finish()
    }
}
