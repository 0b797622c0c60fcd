use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A telemetry event about a talent.
///
/// Identity is `id`. `score` is `None` until a scoring worker fills it in; after the event
/// leaves the pipeline it is never mutated again.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Unique event identifier (used for deduplication).
    pub id: Uuid,
    /// The talent this event is about.
    pub talent_id: String,
    /// Raw metric fed to the scorer.
    pub raw_metric: f64,
    /// Skill the metric was measured on.
    pub skill: String,
    /// When the event happened.
    pub ts: DateTime<Utc>,
    /// Score assigned by the pipeline.
    pub score: Option<f64>,
}

impl Event {
    /// Creates an unscored event.
    pub fn new(
        id: Uuid,
        talent_id: impl Into<String>,
        raw_metric: f64,
        skill: impl Into<String>,
        ts: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            talent_id: talent_id.into(),
            raw_metric,
            skill: skill.into(),
            ts,
            score: None,
        }
    }

    /// Returns a copy of this event carrying `score`.
    #[inline]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Returns `true` once a score has been attached.
    #[inline]
    pub fn is_scored(&self) -> bool {
        self.score.is_some()
    }
}
