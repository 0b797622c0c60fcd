use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::cache::DedupCacheHandle;
use super::snapshot::SnapshotStore;

/// Saves the dedup set every `interval` until `shutdown` fires, then saves once more.
///
/// Failures are logged and retried on the next tick; they never stop the worker.
pub async fn run_snapshot_worker(
    cache: DedupCacheHandle,
    store: Arc<dyn SnapshotStore>,
    interval: Duration,
    shutdown: CancellationToken,
) {
    info!(interval_secs = interval.as_secs(), "starting dedup snapshot worker");

    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => save(&cache, store.as_ref()).await,
            _ = shutdown.cancelled() => break,
        }
    }

    save(&cache, store.as_ref()).await;
    info!("dedup snapshot worker stopped");
}

async fn save(cache: &DedupCacheHandle, store: &dyn SnapshotStore) {
    let snapshot = cache.snapshot();
    let entries = snapshot.len();

    match store.save(&snapshot).await {
        Ok(()) => debug!(entries, "dedup snapshot saved"),
        Err(e) => warn!(entries, error = %e, "dedup snapshot failed, will retry next tick"),
    }
}
