//! Periodic snapshot refresh.
//!
//! A [`SnapshotSource`] fetches one snapshot per call; the
//! [`RefreshController`] calls it on a fixed schedule and swaps the held
//! snapshot on success. Failures are logged and leave state untouched.

mod controller;
mod source;

pub use controller::{
    CycleOutcome, RefreshController, RefreshPhase, RefreshState, DEFAULT_REFRESH_INTERVAL,
};
pub use source::{
    AnySource, FileSnapshotSource, HttpSnapshotSource, SnapshotSource, CACHE_BUST_PARAM,
};
