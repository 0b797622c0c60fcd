use serde::{Deserialize, Serialize};

/// A ranked view of one talent, computed on demand from store state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leader {
    /// 1-based position under descending score, ascending talent id.
    pub rank: usize,
    pub talent_id: String,
    pub score: f64,
}

impl Leader {
    pub fn new(rank: usize, talent_id: impl Into<String>, score: f64) -> Self {
        Self {
            rank,
            talent_id: talent_id.into(),
            score,
        }
    }
}

/// Ordered sequence of leaders.
pub type Leaders = Vec<Leader>;
