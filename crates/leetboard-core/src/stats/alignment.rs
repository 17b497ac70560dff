//! Series alignment onto a shared time axis.
//!
//! The axis is the union of every observation's canonical key, sorted by
//! instant (ties broken by the key string). Each user's counts are projected
//! onto that axis; labels the user has no observation for stay `None`.
//! Gaps are never interpolated or carried forward.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::progress::Snapshot;

/// Per-user counts aligned to a common label axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedSeries {
    /// Canonical keys, ascending by instant.
    pub labels: Vec<String>,
    /// One entry per user, each the same length as `labels`.
    pub series: IndexMap<String, Vec<Option<u64>>>,
}

impl AlignedSeries {
    /// Align every user in the snapshot.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut instants: HashMap<&str, i64> = HashMap::new();
        for (_, observations) in snapshot.iter() {
            for obs in observations {
                instants
                    .entry(obs.canonical_key())
                    .or_insert_with(|| obs.instant_millis());
            }
        }

        let mut axis: Vec<(&str, i64)> = instants.into_iter().collect();
        axis.sort_by(|(key_a, at_a), (key_b, at_b)| at_a.cmp(at_b).then_with(|| key_a.cmp(key_b)));

        let series = snapshot
            .iter()
            .map(|(user, observations)| {
                // later observations win on duplicate keys
                let lookup: HashMap<&str, u64> = observations
                    .iter()
                    .map(|obs| (obs.canonical_key(), obs.count))
                    .collect();
                let points = axis
                    .iter()
                    .map(|(key, _)| lookup.get(key).copied())
                    .collect();
                (user.to_string(), points)
            })
            .collect();

        Self {
            labels: axis.into_iter().map(|(key, _)| key.to_string()).collect(),
            series,
        }
    }

    pub fn points_for(&self, user: &str) -> Option<&[Option<u64>]> {
        self.series.get(user).map(Vec::as_slice)
    }

    /// Value for `user` at `label`, `None` for a gap or an unknown user/label.
    pub fn value_at(&self, user: &str, label: &str) -> Option<u64> {
        let index = self.labels.iter().position(|l| l == label)?;
        self.series.get(user)?.get(index).copied().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
