//! tunecup-league library - League aggregation and statistics
//!
//! [`League`] joins the four record stores and ranks competitors;
//! [`LeagueStats`] derives superlatives and per-competitor profiles on top.
//! Nothing is cached: every query re-scans the stores.

pub mod league;
pub mod stats;
pub mod tally;

pub use league::{League, LeaderboardEntry};
pub use stats::{BestSubmission, CompetitorAverage, CompetitorProfile, LeagueStats, LeagueSummary};
pub use tally::{Extreme, Leader, Tally};
