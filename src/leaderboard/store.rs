use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use ordered_float::OrderedFloat;
use parking_lot::RwLock;

use crate::domain::{Leader, Leaders};

/// Ordered-index key. Sorts in rank order: higher score first, then lower talent id.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RankKey {
    score: OrderedFloat<f64>,
    talent_id: String,
}

impl RankKey {
    fn new(score: f64, talent_id: String) -> Self {
        Self {
            score: OrderedFloat(score),
            talent_id,
        }
    }

    #[inline]
    fn matches(&self, score: f64, talent_id: &str) -> bool {
        self.score == OrderedFloat(score) && self.talent_id == talent_id
    }
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| self.talent_id.cmp(&other.talent_id))
    }
}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default)]
struct Board {
    best_by_talent: HashMap<String, f64>,
    index: BTreeSet<RankKey>,
}

/// Best-score-per-talent store answering top-N and rank queries.
///
/// Designed for one writer (the pipeline consumer) and any number of concurrent readers.
#[derive(Default)]
pub struct LeaderboardStore {
    board: RwLock<Board>,
}

impl LeaderboardStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `score` for `talent_id` if it beats the current best.
    ///
    /// Returns `false` without touching state when the talent already has a score greater
    /// than or equal to `score` (ties never replace). NaN scores are always rejected.
    pub fn update_if_better(&self, talent_id: &str, score: f64) -> bool {
        if score.is_nan() {
            return false;
        }

        let mut board = self.board.write();

        let previous = board.best_by_talent.get(talent_id).copied();
        if let Some(old) = previous {
            if score <= old {
                return false;
            }
            board.index.remove(&RankKey::new(old, talent_id.to_string()));
        }

        board
            .index
            .insert(RankKey::new(score, talent_id.to_string()));
        board.best_by_talent.insert(talent_id.to_string(), score);

        true
    }

    /// Returns the top `n` talents in rank order. `n == 0` yields an empty list.
    pub fn top_n(&self, n: usize) -> Leaders {
        if n == 0 {
            return Vec::new();
        }

        let board = self.board.read();
        board
            .index
            .iter()
            .take(n)
            .enumerate()
            .map(|(i, key)| Leader::new(i + 1, key.talent_id.clone(), key.score.0))
            .collect()
    }

    /// Returns the talent's current rank and best score, or `None` if it has no score yet.
    pub fn rank_of(&self, talent_id: &str) -> Option<Leader> {
        let board = self.board.read();

        let score = *board.best_by_talent.get(talent_id)?;
        let position = board
            .index
            .iter()
            .position(|key| key.matches(score, talent_id))?;

        Some(Leader::new(position + 1, talent_id, score))
    }

    /// Returns every talent ordered by score ascending, then talent id ascending, with ranks
    /// `1..=n` assigned in that order. Meant for full dumps.
    pub fn all(&self) -> Leaders {
        let board = self.board.read();

        // The index is score-descending; walking it backwards flips the id order of ties too.
        let ascending: Vec<&RankKey> = board.index.iter().rev().collect();
        ascending
            .chunk_by(|a, b| a.score == b.score)
            .flat_map(|ties| ties.iter().rev())
            .enumerate()
            .map(|(i, key)| Leader::new(i + 1, key.talent_id.clone(), key.score.0))
            .collect()
    }

    /// Returns the current best score for `talent_id`.
    pub fn best_score(&self, talent_id: &str) -> Option<f64> {
        self.board.read().best_by_talent.get(talent_id).copied()
    }

    /// Returns the number of ranked talents.
    pub fn len(&self) -> usize {
        self.board.read().best_by_talent.len()
    }

    /// Returns `true` if no talent has been ranked yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks that the map and the index describe the same set of `(talent, score)` pairs.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let board = self.board.read();
        board.best_by_talent.len() == board.index.len()
            && board.index.iter().all(|key| {
                board
                    .best_by_talent
                    .get(&key.talent_id)
                    .is_some_and(|score| OrderedFloat(*score) == key.score)
            })
    }
}

impl std::fmt::Debug for LeaderboardStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaderboardStore")
            .field("talents", &self.len())
            .finish()
    }
}

#[derive(Clone, Default)]
/// Shared handle to a [`LeaderboardStore`].
pub struct LeaderboardHandle {
    inner: Arc<LeaderboardStore>,
}

impl LeaderboardHandle {
    /// Creates a handle to a new, empty store.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn update_if_better(&self, talent_id: &str, score: f64) -> bool {
        self.inner.update_if_better(talent_id, score)
    }

    #[inline]
    pub fn top_n(&self, n: usize) -> Leaders {
        self.inner.top_n(n)
    }

    #[inline]
    pub fn rank_of(&self, talent_id: &str) -> Option<Leader> {
        self.inner.rank_of(talent_id)
    }

    #[inline]
    pub fn all(&self) -> Leaders {
        self.inner.all()
    }

    #[inline]
    pub fn best_score(&self, talent_id: &str) -> Option<f64> {
        self.inner.best_score(talent_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the underlying store.
    #[inline]
    pub fn store(&self) -> &LeaderboardStore {
        &self.inner
    }
}

impl std::fmt::Debug for LeaderboardHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaderboardHandle")
            .field("strong_count", &Arc::strong_count(&self.inner))
            .finish()
    }
}
