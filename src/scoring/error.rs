use std::time::Duration;

use thiserror::Error;

/// Why an event could not be scored.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScoringError {
    #[error("scoring computation failed: {reason}")]
    ComputationFailed { reason: String },

    #[error("scoring timed out after {timeout:?}")]
    Timeout { timeout: Duration },
}

/// Errors reported by the pipeline to producers.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input queue has been closed; no further events are accepted.
    #[error("scoring pipeline input is closed")]
    Closed,

    /// Construction parameters were rejected.
    #[error("invalid pipeline config: {0}")]
    InvalidConfig(String),
}
