use std::ops::{Range, RangeInclusive};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use super::error::ScoringError;
use crate::constants::{
    SIMULATED_MAX_LATENCY_MS, SIMULATED_MAX_SCORE, SIMULATED_MIN_LATENCY_MS, SIMULATED_MIN_SCORE,
};

#[async_trait]
/// Turns a raw metric into a score.
///
/// Implementations must be pure with respect to their inputs and may take a while (the
/// pipeline runs many calls in parallel).
pub trait Scorer: Send + Sync {
    /// Scores `raw_metric` measured on `skill`.
    async fn score(&self, raw_metric: f64, skill: &str) -> Result<f64, ScoringError>;
}

/// Placeholder scorer: random latency, random score. Inputs are ignored.
#[derive(Debug, Clone)]
pub struct SimulatedScorer {
    latency_ms: RangeInclusive<u64>,
    score_range: Range<f64>,
}

impl SimulatedScorer {
    /// Creates a scorer with the default latency and score ranges.
    pub fn new() -> Self {
        Self {
            latency_ms: SIMULATED_MIN_LATENCY_MS..=SIMULATED_MAX_LATENCY_MS,
            score_range: SIMULATED_MIN_SCORE..SIMULATED_MAX_SCORE,
        }
    }

    /// Overrides the latency range (milliseconds, inclusive). `0..=0` disables the delay.
    pub fn with_latency_ms(mut self, latency_ms: RangeInclusive<u64>) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Overrides the score range.
    pub fn with_score_range(mut self, score_range: Range<f64>) -> Self {
        self.score_range = score_range;
        self
    }
}

impl Default for SimulatedScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Scorer for SimulatedScorer {
    async fn score(&self, _raw_metric: f64, _skill: &str) -> Result<f64, ScoringError> {
        // ThreadRng is !Send; draw everything before the first await.
        let (delay_ms, score) = {
            let mut rng = rand::thread_rng();
            let delay_ms = if self.latency_ms.is_empty() {
                0
            } else {
                rng.gen_range(self.latency_ms.clone())
            };
            let score = if self.score_range.is_empty() {
                self.score_range.start
            } else {
                rng.gen_range(self.score_range.clone())
            };
            (delay_ms, score)
        };

        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        Ok(score)
    }
}

#[cfg(any(test, feature = "mock"))]
type ScoreFn = dyn Fn(f64, &str) -> Result<f64, ScoringError> + Send + Sync;

/// Scorer driven by a closure, with an optional fixed delay.
#[cfg(any(test, feature = "mock"))]
pub struct MockScorer {
    score_fn: Box<ScoreFn>,
    delay: Duration,
}

#[cfg(any(test, feature = "mock"))]
impl MockScorer {
    pub fn new<F>(score_fn: F) -> Self
    where
        F: Fn(f64, &str) -> Result<f64, ScoringError> + Send + Sync + 'static,
    {
        Self {
            score_fn: Box::new(score_fn),
            delay: Duration::ZERO,
        }
    }

    /// Scores every event with its raw metric.
    pub fn identity() -> Self {
        Self::new(|raw_metric, _| Ok(raw_metric))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl Scorer for MockScorer {
    async fn score(&self, raw_metric: f64, skill: &str) -> Result<f64, ScoringError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.score_fn)(raw_metric, skill)
    }
}

#[cfg(any(test, feature = "mock"))]
impl std::fmt::Debug for MockScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockScorer")
            .field("delay", &self.delay)
            .finish()
    }
}
