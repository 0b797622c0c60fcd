use metrics_exporter_prometheus::PrometheusHandle;

use crate::ingest::EventIngestor;
use crate::leaderboard::LeaderboardHandle;

#[derive(Clone)]
pub struct HandlerState {
    pub ingestor: EventIngestor,

    pub leaderboard: LeaderboardHandle,

    /// `None` when no Prometheus recorder could be installed.
    pub metrics: Option<PrometheusHandle>,
}

impl HandlerState {
    pub fn new(ingestor: EventIngestor, leaderboard: LeaderboardHandle) -> Self {
        Self {
            ingestor,
            leaderboard,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Option<PrometheusHandle>) -> Self {
        self.metrics = metrics;
        self
    }
}
