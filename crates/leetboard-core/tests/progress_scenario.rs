//! End-to-end projections of a small two-user snapshot.

use leetboard_core::{AlignedSeries, DifficultySnapshot, Leaderboard, ProgressReport, Snapshot};

const TWO_USERS: &str = r#"{
    "alice": [
        {"date": "2024-01-01", "count": 5},
        {"date": "2024-01-02", "count": 9}
    ],
    "bob": [
        {"date": "2024-01-01", "count": 12}
    ]
}"#;

#[test]
fn test_leaderboard_ranks_bob_above_alice() {
    let snapshot = Snapshot::from_json_str(TWO_USERS).unwrap();
    let board = Leaderboard::from_snapshot(&snapshot);

    let rows = board.rows();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].user, "bob");
    assert_eq!(rows[0].latest_count, 12);
    assert_eq!(rows[0].gain, 0);
    assert_eq!(rows[0].last_updated, "2024-01-01");
    assert_eq!(rows[0].rank, 1);

    assert_eq!(rows[1].user, "alice");
    assert_eq!(rows[1].latest_count, 9);
    assert_eq!(rows[1].gain, 4);
    assert_eq!(rows[1].last_updated, "2024-01-02");
    assert_eq!(rows[1].rank, 2);
}

#[test]
fn test_aligned_series_leaves_gap_for_bob() {
    let snapshot = Snapshot::from_json_str(TWO_USERS).unwrap();
    let aligned = AlignedSeries::from_snapshot(&snapshot);

    assert_eq!(aligned.labels, vec!["2024-01-01", "2024-01-02"]);
    assert_eq!(aligned.points_for("bob"), Some(&[Some(12), None][..]));
    assert_eq!(aligned.points_for("alice"), Some(&[Some(5), Some(9)][..]));
}

#[test]
fn test_scenario_has_no_difficulty_data() {
    let snapshot = Snapshot::from_json_str(TWO_USERS).unwrap();
    let difficulty = DifficultySnapshot::from_snapshot(&snapshot);
    assert!(!difficulty.has_difficulty_data);
    assert_eq!(difficulty.by_user.len(), 2);
}

#[test]
fn test_report_json_shape() {
    let snapshot = Snapshot::from_json_str(TWO_USERS).unwrap();
    let report = ProgressReport::from_snapshot(&snapshot);
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["leaderboard"][0]["user"], "bob");
    assert_eq!(json["leaderboard"][0]["latestCount"], 12);
    assert_eq!(json["leaderboard"][1]["lastUpdated"], "2024-01-02");
    assert_eq!(json["aligned"]["series"]["bob"][1], serde_json::Value::Null);
    assert_eq!(json["difficulty"]["hasDifficultyData"], false);
}

#[test]
fn test_sparse_fields_never_fail() {
    let body = r#"{
        "carol": [],
        "dave": [{"count": null}],
        "erin": [{"timestamp": "2024-01-03T10:30:00Z", "count": 7, "hard": 2}],
        "finn": [{"date": "garbage", "count": 1}]
    }"#;
    let snapshot = Snapshot::from_json_str(body).unwrap();

    let board = Leaderboard::from_snapshot(&snapshot);
    let carol = board.get("carol").unwrap();
    assert_eq!(carol.latest_count, 0);
    assert_eq!(carol.last_updated, "-");
    assert_eq!(board.get("dave").unwrap().last_updated, "-");
    assert_eq!(board.rows()[0].user, "erin");

    let aligned = AlignedSeries::from_snapshot(&snapshot);
    // "" and "garbage" both resolve to instant 0 and sort before real dates
    assert_eq!(aligned.labels, vec!["", "garbage", "2024-01-03T10:30:00Z"]);

    let difficulty = DifficultySnapshot::from_snapshot(&snapshot);
    assert!(difficulty.has_difficulty_data);
    assert_eq!(difficulty.get("erin").unwrap().hard, 2);
    assert_eq!(difficulty.get("erin").unwrap().easy, 0);
}
