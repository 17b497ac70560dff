//! Projections of a progress snapshot.
//!
//! Every projection is a pure function of one [`Snapshot`](crate::progress::Snapshot):
//! the ranked leaderboard, the time-aligned series for charting, and the
//! latest difficulty split. None of them keeps state between calls.

mod alignment;
mod difficulty;
mod leaderboard;
mod report;

pub use alignment::AlignedSeries;
pub use difficulty::{DifficultyBreakdown, DifficultySnapshot};
pub use leaderboard::{summarize_series, Leaderboard, LeaderboardRow, TotalsChart};
pub use report::ProgressReport;
