//! Latest easy/medium/hard split per user.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::progress::{Observation, Snapshot};

/// Difficulty split from one observation; absent fields read as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyBreakdown {
    pub easy: u64,
    pub medium: u64,
    pub hard: u64,
}

impl DifficultyBreakdown {
    pub fn from_observation(obs: &Observation) -> Self {
        Self {
            easy: obs.easy.unwrap_or(0),
            medium: obs.medium.unwrap_or(0),
            hard: obs.hard.unwrap_or(0),
        }
    }

    /// Sum of the split, saturating at `u64::MAX`. Not reconciled with the
    /// observation's `count`.
    pub fn total(&self) -> u64 {
        self.easy.saturating_add(self.medium).saturating_add(self.hard)
    }
}

/// Latest difficulty split for every user in a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultySnapshot {
    pub by_user: IndexMap<String, DifficultyBreakdown>,
    /// True iff some user's latest observation defines at least one field.
    pub has_difficulty_data: bool,
}

impl DifficultySnapshot {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut has_difficulty_data = false;
        let by_user = snapshot
            .iter()
            .map(|(user, series)| {
                let breakdown = match series.last() {
                    Some(latest) => {
                        has_difficulty_data |= latest.has_difficulty();
                        DifficultyBreakdown::from_observation(latest)
                    }
                    None => DifficultyBreakdown::default(),
                };
                (user.to_string(), breakdown)
            })
            .collect();

        Self {
            by_user,
            has_difficulty_data,
        }
    }

    pub fn get(&self, user: &str) -> Option<&DifficultyBreakdown> {
        self.by_user.get(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uses_latest_observation_only() {
        let snapshot = Snapshot::new().with_user(
            "amy",
            vec![
                Observation::on_date("2024-01-01", 10).with_difficulty(5, 4, 1),
                Observation::on_date("2024-01-02", 14).with_difficulty(6, 6, 2),
            ],
        );

        let diff = DifficultySnapshot::from_snapshot(&snapshot);
        assert_eq!(
            diff.get("amy"),
            Some(&DifficultyBreakdown { easy: 6, medium: 6, hard: 2 })
        );
        assert!(diff.has_difficulty_data);
    }

    #[test]
    fn test_partial_fields_default_to_zero() {
        let mut latest = Observation::on_date("2024-01-01", 3);
        latest.medium = Some(2);
        let snapshot = Snapshot::new().with_user("amy", vec![latest]);

        let diff = DifficultySnapshot::from_snapshot(&snapshot);
        assert_eq!(
            diff.get("amy"),
            Some(&DifficultyBreakdown { easy: 0, medium: 2, hard: 0 })
        );
        assert!(diff.has_difficulty_data);
    }

    #[test]
    fn test_no_difficulty_fields_anywhere() {
        let snapshot = Snapshot::new()
            .with_user("amy", vec![Observation::on_date("2024-01-01", 3)])
            .with_user("bob", vec![]);

        let diff = DifficultySnapshot::from_snapshot(&snapshot);
        assert!(!diff.has_difficulty_data);
        assert_eq!(diff.get("bob"), Some(&DifficultyBreakdown::default()));
    }

    #[test]
    fn test_older_breakdown_does_not_count() {
        let snapshot = Snapshot::new().with_user(
            "amy",
            vec![
                Observation::on_date("2024-01-01", 3).with_difficulty(1, 1, 1),
                Observation::on_date("2024-01-02", 4),
            ],
        );

        let diff = DifficultySnapshot::from_snapshot(&snapshot);
        assert!(!diff.has_difficulty_data);
        assert_eq!(diff.get("amy"), Some(&DifficultyBreakdown::default()));
    }

    #[test]
    fn test_zero_values_still_count_as_present() {
        let snapshot = Snapshot::new().with_user(
            "amy",
            vec![Observation::on_date("2024-01-01", 0).with_difficulty(0, 0, 0)],
        );
        assert!(DifficultySnapshot::from_snapshot(&snapshot).has_difficulty_data);
    }

    #[test]
    fn test_breakdown_total_is_independent_of_count() {
        let obs = Observation::on_date("2024-01-01", 100).with_difficulty(1, 2, 3);
        assert_eq!(DifficultyBreakdown::from_observation(&obs).total(), 6);
    }

    #[test]
    fn test_breakdown_total_saturates() {
        let obs = Observation::on_date("2024-01-01", 1).with_difficulty(u64::MAX, u64::MAX, 1);
        assert_eq!(DifficultyBreakdown::from_observation(&obs).total(), u64::MAX);
    }
}
