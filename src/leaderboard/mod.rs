//! Live leaderboard: best score per talent plus an ordered index for ranking queries.
//!
//! # Consistency
//!
//! The best-score map and the ordered index sit behind one reader/writer lock and change
//! together. Updates take the write side; [`LeaderboardStore::top_n`],
//! [`LeaderboardStore::rank_of`] and [`LeaderboardStore::all`] take the read side, so a
//! reader never observes the two structures out of step.
//!
//! # Ordering
//!
//! Rank order is score descending, then talent id ascending. Ranks are 1-based and always
//! recomputed from the index, never stored.
//!
//! # Cost
//!
//! | Operation | Cost |
//! |---|---|
//! | `update_if_better` | O(log n) |
//! | `top_n(k)` | O(log n + k) |
//! | `rank_of` | O(log n + rank) |
//! | `all` | O(n) |
//!
//! `rank_of` walks from the top because the index keeps no subtree sizes. Lookups for
//! top-ranked talents stay cheap; a uniform O(log n) rank needs an order-statistics tree.

mod consumer;
mod store;


pub use consumer::run_consumer;
pub use store::{LeaderboardHandle, LeaderboardStore};
