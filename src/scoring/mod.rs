//! Scoring pipeline: a fixed worker pool between two bounded queues.
//!
//! ```text
//! submit ──▶ [input queue] ──▶ worker × N ──▶ [output queue] ──▶ consumer
//! ```
//!
//! Both queues are bounded. A full input queue blocks [`PipelineHandle::submit`]; a full
//! output queue blocks the workers. That backpressure is what throttles ingestion when
//! scoring falls behind.
//!
//! Workers run independently, so scored events leave in completion order, not submission
//! order.
//!
//! # Shutdown
//!
//! [`ScoringPipeline::shutdown`] closes the input queue, lets every worker finish what it
//! has already dequeued (buffered events are drained), and waits for all of them. Each
//! worker owns a clone of the output sender, so the output queue closes exactly when the
//! last worker exits.

pub mod error;
pub mod pipeline;
pub mod scorer;


pub use error::{PipelineError, ScoringError};
pub use pipeline::{PipelineConfig, PipelineHandle, ScoredEvent, ScoringPipeline};
#[cfg(any(test, feature = "mock"))]
pub use scorer::MockScorer;
pub use scorer::{Scorer, SimulatedScorer};
