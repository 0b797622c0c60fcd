use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::store::LeaderboardHandle;
use crate::metrics::{EventOutcome, IngestMetrics};
use crate::scoring::ScoredEvent;

/// Drains the pipeline output into the store until the queue closes.
///
/// There must be exactly one consumer per store. Returns the number of events that raised
/// a talent's best score.
pub async fn run_consumer(
    store: LeaderboardHandle,
    mut scored: mpsc::Receiver<ScoredEvent>,
    metrics: Arc<dyn IngestMetrics>,
) -> u64 {
    info!("starting leaderboard worker");

    let mut applied = 0u64;
    while let Some(item) = scored.recv().await {
        match item {
            ScoredEvent::Scored(event) => {
                let Some(score) = event.score else {
                    warn!(event_id = %event.id, "scored event without a score, skipping");
                    continue;
                };

                if store.update_if_better(&event.talent_id, score) {
                    applied += 1;
                    metrics.record(EventOutcome::Updated);
                    debug!(talent_id = %event.talent_id, score, "leaderboard updated");
                }
            }
            ScoredEvent::Failed { event, error } => {
                metrics.record(EventOutcome::ScoreFailed);
                warn!(
                    event_id = %event.id,
                    talent_id = %event.talent_id,
                    error = %error,
                    "dropping unscored event"
                );
            }
        }
    }

    info!(applied, "leaderboard worker stopped");
    applied
}
