//! Observation and snapshot types.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use super::key::{canonical_key, instant_millis};
use crate::error::FetchError;

/// Label shown when an observation carries neither timestamp nor date.
pub const NO_LABEL: &str = "-";

/// One sample of a user's cumulative solved-problem count.
///
/// All fields are optional on the wire. `count` is the authoritative total;
/// the difficulty split is informational and need not add up to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Coarse display date, usually `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Optional high-resolution timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easy: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard: Option<u64>,
}

fn zero_if_null<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or_default())
}

impl Observation {
    /// Observation keyed by a calendar date.
    pub fn on_date(date: &str, count: u64) -> Self {
        Self {
            date: Some(date.to_string()),
            count,
            ..Self::default()
        }
    }

    /// Builder: attach a high-resolution timestamp.
    pub fn with_timestamp(mut self, timestamp: &str) -> Self {
        self.timestamp = Some(timestamp.to_string());
        self
    }

    /// Builder: attach a full easy/medium/hard split.
    pub fn with_difficulty(mut self, easy: u64, medium: u64, hard: u64) -> Self {
        self.easy = Some(easy);
        self.medium = Some(medium);
        self.hard = Some(hard);
        self
    }

    /// Key used to align this observation with other users' series.
    pub fn canonical_key(&self) -> &str {
        canonical_key(self.timestamp.as_deref(), self.date.as_deref())
    }

    /// Milliseconds since the Unix epoch denoted by [`Self::canonical_key`].
    pub fn instant_millis(&self) -> i64 {
        instant_millis(self.canonical_key())
    }

    /// Most specific display label: timestamp, then date, then `"-"`.
    pub fn last_updated_label(&self) -> &str {
        [self.timestamp.as_deref(), self.date.as_deref()]
            .into_iter()
            .flatten()
            .find(|label| !label.is_empty())
            .unwrap_or(NO_LABEL)
    }

    /// Whether any of the three difficulty fields is present.
    pub fn has_difficulty(&self) -> bool {
        self.easy.is_some() || self.medium.is_some() || self.hard.is_some()
    }
}

/// Observations for one user, in the order the producer supplied them.
pub type UserSeries = Vec<Observation>;

/// Every user's series at one fetch instant.
///
/// This is the unit of atomic replacement. Users keep the document order of
/// the producer's JSON object, which is what ranking ties fall back to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    users: IndexMap<String, UserSeries>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a snapshot document.
    ///
    /// An empty body or a JSON `null` is an empty snapshot, not an error.
    pub fn from_json_slice(body: &[u8]) -> Result<Self, FetchError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let parsed: Option<Snapshot> = serde_json::from_slice(body)?;
        Ok(parsed.unwrap_or_default())
    }

    pub fn from_json_str(body: &str) -> Result<Self, FetchError> {
        Self::from_json_slice(body.as_bytes())
    }

    /// Builder: append a user (replacing any series already stored for it).
    pub fn with_user(mut self, user: &str, series: UserSeries) -> Self {
        self.insert(user, series);
        self
    }

    pub fn insert(&mut self, user: &str, series: UserSeries) -> Option<UserSeries> {
        self.users.insert(user.to_string(), series)
    }

    pub fn get(&self, user: &str) -> Option<&UserSeries> {
        self.users.get(user)
    }

    /// Users with their series, in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Observation])> {
        self.users
            .iter()
            .map(|(user, series)| (user.as_str(), series.as_slice()))
    }

    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Total number of observations across every user.
    pub fn observation_count(&self) -> usize {
        self.users.values().map(Vec::len).sum()
    }
}

impl FromIterator<(String, UserSeries)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, UserSeries)>>(iter: I) -> Self {
        Self {
            users: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_preserves_document_order() {
        let snapshot = Snapshot::from_json_str(
            r#"{"zed":[{"date":"2024-01-01","count":1}],"amy":[],"bob":[]}"#,
        )
        .unwrap();
        let users: Vec<&str> = snapshot.users().collect();
        assert_eq!(users, vec!["zed", "amy", "bob"]);
    }

    #[test]
    fn test_decode_defaults_missing_fields() {
        let snapshot =
            Snapshot::from_json_str(r#"{"amy":[{"date":"2024-01-01"},{"count":null}]}"#).unwrap();
        let series = snapshot.get("amy").unwrap();
        assert_eq!(series[0].count, 0);
        assert_eq!(series[1].count, 0);
        assert_eq!(series[1].date, None);
        assert!(!series[0].has_difficulty());
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let snapshot =
            Snapshot::from_json_str(r#"{"amy":[{"date":"2024-01-01","count":3,"rank":9}]}"#)
                .unwrap();
        assert_eq!(snapshot.get("amy").unwrap()[0].count, 3);
    }

    #[test]
    fn test_empty_and_null_bodies_are_empty_snapshots() {
        assert!(Snapshot::from_json_str("").unwrap().is_empty());
        assert!(Snapshot::from_json_str("  \n").unwrap().is_empty());
        assert!(Snapshot::from_json_str("null").unwrap().is_empty());
        assert!(Snapshot::from_json_str("{}").unwrap().is_empty());
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        assert!(matches!(
            Snapshot::from_json_str("[1,2,3]"),
            Err(FetchError::Malformed(_))
        ));
        assert!(matches!(
            Snapshot::from_json_str(r#"{"amy":[{"count":-1}]}"#),
            Err(FetchError::Malformed(_))
        ));
        assert!(matches!(
            Snapshot::from_json_str(r#"{"amy":{"count":1}}"#),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn test_last_updated_label_fallbacks() {
        let with_ts = Observation::on_date("2024-01-02", 1).with_timestamp("2024-01-02T09:00:00Z");
        assert_eq!(with_ts.last_updated_label(), "2024-01-02T09:00:00Z");

        let empty_ts = Observation::on_date("2024-01-02", 1).with_timestamp("");
        assert_eq!(empty_ts.last_updated_label(), "2024-01-02");

        assert_eq!(Observation::default().last_updated_label(), NO_LABEL);
    }

    #[test]
    fn test_has_difficulty_checks_presence_not_value() {
        let mut obs = Observation::on_date("2024-01-02", 1);
        assert!(!obs.has_difficulty());
        obs.hard = Some(0);
        assert!(obs.has_difficulty());
    }

    #[test]
    fn test_serialization_skips_absent_fields() {
        let obs = Observation::on_date("2024-01-02", 4);
        let json = serde_json::to_string(&obs).unwrap();
        assert_eq!(json, r#"{"date":"2024-01-02","count":4}"#);
    }

    #[test]
    fn test_observation_count() {
        let snapshot = Snapshot::new()
            .with_user("amy", vec![Observation::on_date("2024-01-01", 1); 3])
            .with_user("bob", vec![]);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.observation_count(), 3);
    }
}
