//! Leaderboard library crate (used by the server and integration tests).
//!
//! A real-time talent ranking service:
//!
//! ```text
//! POST /events -> ingest (dedup) -> scoring pipeline -> leaderboard consumer -> store
//!                                                                      ^
//!                                     GET /leaderboard, /rank/{id} ----+
//! ```
//!
//! ## Core Types
//! - [`DedupCache`] - set of admitted event ids, with snapshot/restore
//! - [`ScoringPipeline`] - worker pool between two bounded queues
//! - [`LeaderboardStore`] - best score per talent plus an ordered rank index
//!
//! ## Wiring
//! - [`EventIngestor`] - admission path used by the gateway
//! - [`App`] - builds everything from [`Config`] and shuts it down in order
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod app;
pub mod config;
pub mod constants;
pub mod dedup;
pub mod domain;
pub mod gateway;
pub mod ingest;
pub mod leaderboard;
pub mod metrics;
pub mod scoring;

pub use app::App;
pub use config::{Config, ConfigError};
pub use dedup::{
    DedupCache, DedupCacheHandle, DedupSnapshot, FileSnapshotStore, NoopSnapshotStore,
    SnapshotError, SnapshotStore,
};
pub use domain::{Event, Leader, Leaders};
pub use gateway::{GatewayError, create_router_with_state};
pub use ingest::{Admission, EventIngestor};
pub use leaderboard::{LeaderboardHandle, LeaderboardStore, run_consumer};
pub use crate::metrics::{EventOutcome, IngestMetrics, NoopMetrics, PrometheusMetrics};
#[cfg(any(test, feature = "mock"))]
pub use crate::metrics::RecordingMetrics;
#[cfg(any(test, feature = "mock"))]
pub use scoring::MockScorer;
pub use scoring::{
    PipelineConfig, PipelineError, PipelineHandle, ScoredEvent, Scorer, ScoringError,
    ScoringPipeline, SimulatedScorer,
};
