//! Admission of incoming events: dedup check, mark, hand-off to the scoring pipeline.

mod seed;


use std::sync::Arc;

use tracing::debug;

use crate::dedup::DedupCacheHandle;
use crate::domain::Event;
use crate::metrics::{EventOutcome, IngestMetrics};
use crate::scoring::{PipelineError, PipelineHandle};

pub use seed::{SEED_SKILLS, generate_event, generate_events, round2};

/// Result of admitting one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// `true` if the event id had already been admitted.
    pub duplicate: bool,
}

/// Front door of the pipeline for producers.
#[derive(Clone)]
pub struct EventIngestor {
    dedup: DedupCacheHandle,
    pipeline: PipelineHandle,
    metrics: Arc<dyn IngestMetrics>,
}

impl EventIngestor {
    pub fn new(
        dedup: DedupCacheHandle,
        pipeline: PipelineHandle,
        metrics: Arc<dyn IngestMetrics>,
    ) -> Self {
        Self {
            dedup,
            pipeline,
            metrics,
        }
    }

    /// Admits `event` unless its id was seen before.
    ///
    /// New events are marked and submitted; submission waits while the pipeline input is
    /// full. Only the first of several concurrent deliveries of one id is submitted.
    pub async fn admit(&self, event: Event) -> Result<Admission, PipelineError> {
        if self.dedup.is_marked(&event.id) || !self.dedup.try_mark(event.id) {
            self.metrics.record(EventOutcome::Duplicate);
            debug!(event_id = %event.id, "duplicate event");
            return Ok(Admission { duplicate: true });
        }

        debug!(event_id = %event.id, talent_id = %event.talent_id, "event accepted");
        self.pipeline.submit(event).await?;
        self.metrics.record(EventOutcome::Accepted);

        Ok(Admission { duplicate: false })
    }

    /// Submits `count` generated events straight to the pipeline, bypassing dedup.
    ///
    /// Events are generated one at a time, so memory stays flat for any `count`.
    pub async fn seed(&self, count: usize) -> Result<usize, PipelineError> {
        for event in generate_events(count) {
            self.pipeline.submit(event).await?;
        }
        debug!(count, "seed events submitted");
        Ok(count)
    }

    pub fn dedup(&self) -> &DedupCacheHandle {
        &self.dedup
    }
}

impl std::fmt::Debug for EventIngestor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventIngestor")
            .field("dedup", &self.dedup)
            .field("pipeline", &self.pipeline)
            .finish()
    }
}
