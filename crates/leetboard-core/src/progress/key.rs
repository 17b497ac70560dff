//! Canonical ordering keys for observations.
//!
//! Observations are aligned across users by a string key and sorted by the
//! instant that key denotes. Parsing walks an ordered fallback chain and
//! never fails:
//!
//! ```text
//! full date-time  ->  key + "T00:00:00Z"  ->  0 (Unix epoch)
//! ```

use chrono::{DateTime, NaiveDateTime};

/// Suffix appended to a bare date so it parses as midnight UTC.
pub const MIDNIGHT_UTC_SUFFIX: &str = "T00:00:00Z";

/// Offset-less layouts, read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Resolve the canonical key: a non-empty timestamp wins over the date.
///
/// Returns the empty string when neither is available.
pub fn canonical_key<'a>(timestamp: Option<&'a str>, date: Option<&'a str>) -> &'a str {
    match timestamp {
        Some(ts) if !ts.is_empty() => ts,
        _ => date.unwrap_or(""),
    }
}

/// Map a key to milliseconds since the Unix epoch.
///
/// Total: unparsable input resolves to `0` so it sorts first.
pub fn instant_millis(key: &str) -> i64 {
    parse_date_time(key)
        .or_else(|| parse_date_time(&format!("{}{}", key.trim(), MIDNIGHT_UTC_SUFFIX)))
        .unwrap_or(0)
}

fn parse_date_time(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.timestamp_millis());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc().timestamp_millis())
}
