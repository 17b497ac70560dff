//! Leaderboard ranking.
//!
//! Each user's series is reduced to its latest total, a last-updated label,
//! and the gain versus the previous observation. Rows are ordered by latest
//! total, highest first; equal totals keep the snapshot's user order.

use serde::{Deserialize, Serialize};

use crate::progress::{Observation, Snapshot, NO_LABEL};

/// One user's standing in the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    /// 1-based position in the ordered leaderboard
    pub rank: usize,
    pub user: String,
    /// `count` of the last observation (0 for an empty series)
    pub latest_count: u64,
    /// Timestamp, else date, of the last observation; `"-"` when unknown
    pub last_updated: String,
    /// Latest count minus the previous count; may be negative
    pub gain: i64,
}

impl LeaderboardRow {
    /// Gain with an explicit sign for non-negative values (`+4`, `+0`, `-2`).
    pub fn gain_label(&self) -> String {
        if self.gain >= 0 {
            format!("+{}", self.gain)
        } else {
            self.gain.to_string()
        }
    }
}

/// Bar chart data: latest totals in leaderboard order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalsChart {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

/// Ordered leaderboard computed from one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    rows: Vec<LeaderboardRow>,
}

impl Leaderboard {
    /// Rank every user in the snapshot.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut rows: Vec<LeaderboardRow> = snapshot
            .iter()
            .map(|(user, series)| summarize_series(user, series))
            .collect();

        // sort_by is stable: ties keep snapshot order
        rows.sort_by(|a, b| b.latest_count.cmp(&a.latest_count));

        for (index, row) in rows.iter_mut().enumerate() {
            row.rank = index + 1;
        }

        Self { rows }
    }

    pub fn rows(&self) -> &[LeaderboardRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, user: &str) -> Option<&LeaderboardRow> {
        self.rows.iter().find(|row| row.user == user)
    }

    /// Latest totals per user, in rank order.
    pub fn totals_chart(&self) -> TotalsChart {
        TotalsChart {
            labels: self.rows.iter().map(|row| row.user.clone()).collect(),
            values: self.rows.iter().map(|row| row.latest_count).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Leaderboard {
    type Item = &'a LeaderboardRow;
    type IntoIter = std::slice::Iter<'a, LeaderboardRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Reduce one user's series to an unranked row (`rank` is 0).
pub fn summarize_series(user: &str, series: &[Observation]) -> LeaderboardRow {
    let (latest, previous) = match series {
        [] => (None, None),
        [only] => (Some(only), None),
        [.., prev, last] => (Some(last), Some(prev)),
    };

    let latest_count = latest.map(|obs| obs.count).unwrap_or(0);
    let gain = previous
        .map(|prev| signed_delta(latest_count, prev.count))
        .unwrap_or(0);

    LeaderboardRow {
        rank: 0,
        user: user.to_string(),
        latest_count,
        last_updated: latest
            .map(Observation::last_updated_label)
            .unwrap_or(NO_LABEL)
            .to_string(),
        gain,
    }
}

fn signed_delta(latest: u64, previous: u64) -> i64 {
    let delta = i128::from(latest) - i128::from(previous);
    delta.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(date: &str, count: u64) -> Observation {
        Observation::on_date(date, count)
    }

    #[test]
    fn test_empty_series_defaults() {
        let row = summarize_series("amy", &[]);
        assert_eq!(row.latest_count, 0);
        assert_eq!(row.last_updated, "-");
        assert_eq!(row.gain, 0);
    }

    #[test]
    fn test_single_observation_has_zero_gain() {
        let row = summarize_series("amy", &[obs("2024-01-01", 7)]);
        assert_eq!(row.latest_count, 7);
        assert_eq!(row.gain, 0);
        assert_eq!(row.last_updated, "2024-01-01");
    }

    #[test]
    fn test_gain_uses_last_two_observations() {
        let row = summarize_series(
            "amy",
            &[obs("2024-01-01", 1), obs("2024-01-02", 5), obs("2024-01-03", 9)],
        );
        assert_eq!(row.latest_count, 9);
        assert_eq!(row.gain, 4);
    }

    #[test]
    fn test_negative_gain_is_kept() {
        let row = summarize_series("amy", &[obs("2024-01-01", 10), obs("2024-01-02", 8)]);
        assert_eq!(row.gain, -2);
        assert_eq!(row.gain_label(), "-2");
    }

    #[test]
    fn test_last_updated_prefers_timestamp() {
        let latest = obs("2024-01-02", 3).with_timestamp("2024-01-02T18:45:00Z");
        let row = summarize_series("amy", &[latest]);
        assert_eq!(row.last_updated, "2024-01-02T18:45:00Z");
    }

    #[test]
    fn test_gain_label_signs() {
        let mut row = summarize_series("amy", &[obs("2024-01-01", 3), obs("2024-01-02", 7)]);
        assert_eq!(row.gain_label(), "+4");
        row.gain = 0;
        assert_eq!(row.gain_label(), "+0");
    }

    #[test]
    fn test_ranking_orders_by_latest_count() {
        let snapshot = Snapshot::new()
            .with_user("amy", vec![obs("2024-01-01", 5), obs("2024-01-02", 9)])
            .with_user("bob", vec![obs("2024-01-01", 12)])
            .with_user("cat", vec![]);

        let board = Leaderboard::from_snapshot(&snapshot);
        let users: Vec<&str> = board.rows().iter().map(|r| r.user.as_str()).collect();
        assert_eq!(users, vec!["bob", "amy", "cat"]);

        let ranks: Vec<usize> = board.rows().iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_ties_keep_snapshot_order() {
        let snapshot = Snapshot::new()
            .with_user("zed", vec![obs("2024-01-01", 4)])
            .with_user("amy", vec![obs("2024-01-01", 4)])
            .with_user("mia", vec![obs("2024-01-01", 4)]);

        let board = Leaderboard::from_snapshot(&snapshot);
        let users: Vec<&str> = board.rows().iter().map(|r| r.user.as_str()).collect();
        assert_eq!(users, vec!["zed", "amy", "mia"]);
    }

    #[test]
    fn test_totals_chart_follows_rank_order() {
        let snapshot = Snapshot::new()
            .with_user("amy", vec![obs("2024-01-01", 2)])
            .with_user("bob", vec![obs("2024-01-01", 8)]);

        let chart = Leaderboard::from_snapshot(&snapshot).totals_chart();
        assert_eq!(chart.labels, vec!["bob", "amy"]);
        assert_eq!(chart.values, vec![8, 2]);
    }

    #[test]
    fn test_empty_snapshot_gives_empty_board() {
        let board = Leaderboard::from_snapshot(&Snapshot::new());
        assert!(board.is_empty());
        assert_eq!(board.totals_chart(), TotalsChart::default());
    }

    #[test]
    fn test_row_serializes_camel_case() {
        let row = summarize_series("amy", &[obs("2024-01-01", 3)]);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["latestCount"], 3);
        assert_eq!(json["lastUpdated"], "2024-01-01");
    }
}
