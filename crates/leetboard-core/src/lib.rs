//! # Leetboard Core Library
//!
//! Aggregation and ranking for per-user solved-problem progress. A producer
//! publishes a snapshot document (user -> ordered observations); this crate
//! turns it into the views the CLI renders and keeps a live copy current.
//!
//! ## Architecture
//!
//! - **Progress**: the snapshot model and canonical time keys
//! - **Stats**: leaderboard, aligned time series and difficulty split
//! - **Refresh**: snapshot sources plus a polling controller with
//!   retain-on-failure semantics
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Snapshot`]: One fetched document
//! - [`Leaderboard`]: Users ranked by latest count
//! - [`AlignedSeries`]: Per-user values on one shared time axis
//! - [`RefreshController`]: Periodic fetch loop with single-writer state
//! - [`Config`]: Application configuration management

pub mod error;
pub mod logging;
pub mod progress;
pub mod refresh;
pub mod stats;
pub mod storage;

pub use error::{ConfigError, CoreError, FetchError};
pub use progress::{Observation, Snapshot, UserSeries};
pub use refresh::{
    AnySource, CycleOutcome, FileSnapshotSource, HttpSnapshotSource, RefreshController,
    RefreshPhase, RefreshState, SnapshotSource,
};
pub use stats::{
    AlignedSeries, DifficultyBreakdown, DifficultySnapshot, Leaderboard, LeaderboardRow,
    ProgressReport, TotalsChart,
};
pub use storage::Config;
