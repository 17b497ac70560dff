//! All projections of one snapshot, computed together.

use serde::{Deserialize, Serialize};

use super::{AlignedSeries, DifficultySnapshot, Leaderboard, TotalsChart};
use crate::progress::Snapshot;

/// Leaderboard, totals chart, aligned series and difficulty split derived
/// from the same snapshot reference, so a consumer never mixes two fetches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub leaderboard: Leaderboard,
    pub totals: TotalsChart,
    pub aligned: AlignedSeries,
    pub difficulty: DifficultySnapshot,
}

impl ProgressReport {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let leaderboard = Leaderboard::from_snapshot(snapshot);
        let totals = leaderboard.totals_chart();
        Self {
            leaderboard,
            totals,
            aligned: AlignedSeries::from_snapshot(snapshot),
            difficulty: DifficultySnapshot::from_snapshot(snapshot),
        }
    }

    /// True when the snapshot held no users.
    pub fn is_empty(&self) -> bool {
        self.leaderboard.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::Observation;

    #[test]
    fn test_report_is_idempotent() {
        let snapshot = Snapshot::new()
            .with_user("amy", vec![Observation::on_date("2024-01-01", 2)])
            .with_user(
                "bob",
                vec![Observation::on_date("2024-01-02", 5).with_difficulty(3, 2, 0)],
            );

        let first = ProgressReport::from_snapshot(&snapshot);
        let second = ProgressReport::from_snapshot(&snapshot);
        assert_eq!(first, second);
        assert_eq!(first.totals.labels, vec!["bob", "amy"]);
        assert!(first.difficulty.has_difficulty_data);
    }

    #[test]
    fn test_empty_snapshot_report() {
        let report = ProgressReport::from_snapshot(&Snapshot::new());
        assert!(report.is_empty());
        assert!(report.aligned.is_empty());
        assert!(!report.difficulty.has_difficulty_data);
    }
}
