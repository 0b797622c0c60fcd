//! Ingest counters.
//!
//! The pipeline reports through the [`IngestMetrics`] sink; [`PrometheusMetrics`] forwards
//! to the `metrics` facade and [`init_metrics`] installs the Prometheus exporter that the
//! gateway renders on `/metrics`.


use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Counter name for processed events, labelled by `result`.
pub const EVENTS_PROCESSED_TOTAL: &str = "leaderboard_ingest_events_processed_total";

/// What happened to an event (used as the `result` label).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventOutcome {
    /// New event admitted into the pipeline.
    Accepted,
    /// Event id was already seen.
    Duplicate,
    /// Scored event raised a talent's best score.
    Updated,
    /// Scorer failed or timed out for the event.
    ScoreFailed,
}

impl EventOutcome {
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            EventOutcome::Accepted => "accepted",
            EventOutcome::Duplicate => "duplicate",
            EventOutcome::Updated => "updated",
            EventOutcome::ScoreFailed => "score_failed",
        }
    }
}

impl std::fmt::Display for EventOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

/// Sink for ingest counters.
pub trait IngestMetrics: Send + Sync {
    /// Increments the counter for `outcome`.
    fn record(&self, outcome: EventOutcome);
}

/// Records into the global `metrics` recorder.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrometheusMetrics;

impl IngestMetrics for PrometheusMetrics {
    fn record(&self, outcome: EventOutcome) {
        metrics::counter!(EVENTS_PROCESSED_TOTAL, "result" => outcome.as_label()).increment(1);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl IngestMetrics for NoopMetrics {
    fn record(&self, _outcome: EventOutcome) {}
}

/// In-memory counters for assertions in tests.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Default)]
pub struct RecordingMetrics {
    counts: parking_lot::Mutex<std::collections::HashMap<EventOutcome, u64>>,
}

#[cfg(any(test, feature = "mock"))]
impl RecordingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many times `outcome` was recorded.
    pub fn count(&self, outcome: EventOutcome) -> u64 {
        self.counts.lock().get(&outcome).copied().unwrap_or(0)
    }
}

#[cfg(any(test, feature = "mock"))]
impl IngestMetrics for RecordingMetrics {
    fn record(&self, outcome: EventOutcome) {
        *self.counts.lock().entry(outcome).or_insert(0) += 1;
    }
}

/// Installs the Prometheus recorder and registers metric descriptions.
///
/// Returns `None` if a recorder is already installed in this process.
pub fn init_metrics() -> Option<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder().ok()?;
    describe_counter!(
        EVENTS_PROCESSED_TOTAL,
        "Total number of processed events by result"
    );
    Some(handle)
}
