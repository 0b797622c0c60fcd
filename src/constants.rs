//! Cross-cutting, shared defaults.
//!
//! Queue capacities and the worker count are starting points only. Size them from measured
//! producer/consumer throughput and pass them in through [`crate::Config`].

/// Default capacity of the pipeline input queue (raw events awaiting scoring).
pub const DEFAULT_INPUT_CAPACITY: usize = 1000;

/// Default capacity of the pipeline output queue (scored events awaiting the store).
pub const DEFAULT_OUTPUT_CAPACITY: usize = 1000;

/// Default number of scoring workers.
pub const DEFAULT_WORKER_COUNT: usize = 1000;

/// Default interval between dedup snapshots.
pub const DEFAULT_SNAPSHOT_INTERVAL_SECS: u64 = 10 * 60;

/// Default overall deadline for the shutdown sequence.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 5;

/// Default `limit` for top-N queries.
pub const DEFAULT_TOP_LIMIT: usize = 10;

/// Largest `limit` accepted for top-N queries.
pub const MAX_TOP_LIMIT: usize = 100;

/// Default number of events generated by a seed request.
pub const DEFAULT_SEED_COUNT: usize = 10;
pub const MAX_SEED_COUNT: usize = 10_000;

/// Placeholder scorer latency bounds (milliseconds, inclusive).
pub const SIMULATED_MIN_LATENCY_MS: u64 = 80;
pub const SIMULATED_MAX_LATENCY_MS: u64 = 150;

/// Placeholder scorer output range (`[min, max)`).
pub const SIMULATED_MIN_SCORE: f64 = 0.0;
pub const SIMULATED_MAX_SCORE: f64 = 200.0;
