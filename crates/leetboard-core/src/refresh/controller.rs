//! Fixed-interval snapshot refresh.
//!
//! The controller owns the single current-snapshot slot. One fetch runs at
//! a time; the next cycle is scheduled only after the previous one resolved.
//!
//! ## Phases
//!
//! ```text
//! Uninitialized -> Loading -> Ready -> Refreshing -> Ready -> ...
//! ```
//!
//! `Loading` is the only phase a consumer should render as "loading";
//! background refreshes keep showing the held snapshot.
//!
//! ## Usage
//!
//! ```ignore
//! let controller = Arc::new(RefreshController::new(source, Duration::from_secs(60)));
//! let mut rx = controller.subscribe();
//! let handle = controller.clone().spawn();
//! // ... rx.changed().await, rx.borrow().snapshot ...
//! controller.shutdown();
//! handle.await?;
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;

use super::source::SnapshotSource;
use crate::progress::Snapshot;
use crate::stats::ProgressReport;

/// Interval between the end of one cycle and the start of the next.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshPhase {
    /// No cycle has started yet.
    #[default]
    Uninitialized,
    /// The first fetch is in flight.
    Loading,
    /// The first fetch resolved, successfully or not.
    Ready,
    /// A background fetch is in flight; the held snapshot stays visible.
    Refreshing,
}

/// Everything a consumer can observe about the controller.
#[derive(Debug, Clone, Default)]
pub struct RefreshState {
    pub phase: RefreshPhase,
    /// Current snapshot, `None` until a fetch has succeeded.
    pub snapshot: Option<Arc<Snapshot>>,
    pub last_success_at: Option<DateTime<Utc>>,
    /// Message of the most recent failure, cleared by the next success.
    pub last_error: Option<String>,
    /// Cycles resolved while the controller was alive, successful or not.
    pub cycles: u64,
    pub failures: u64,
}

impl RefreshState {
    /// Distinct loading indication for the initial fetch only.
    pub fn is_initial_load(&self) -> bool {
        self.phase == RefreshPhase::Loading
    }

    /// Derived projections of the held snapshot.
    pub fn report(&self) -> Option<ProgressReport> {
        self.snapshot
            .as_deref()
            .map(ProgressReport::from_snapshot)
    }
}

/// Result of one refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new snapshot replaced the held one.
    Applied { users: usize },
    /// Fetch or decode failed; state kept.
    Failed,
    /// The controller was shut down before the result could be applied.
    Discarded,
    /// Another cycle was still in flight; nothing was fetched.
    Skipped,
}

/// Clears the in-flight flag when a cycle ends or its future is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Polls a [`SnapshotSource`] and publishes the latest snapshot.
pub struct RefreshController<S> {
    source: S,
    interval: Duration,
    state_tx: watch::Sender<RefreshState>,
    alive: AtomicBool,
    in_flight: AtomicBool,
    stop: Notify,
}

impl<S: SnapshotSource> RefreshController<S> {
    pub fn new(source: S, interval: Duration) -> Self {
        let (state_tx, _) = watch::channel(RefreshState::default());
        Self {
            source,
            interval,
            state_tx,
            alive: AtomicBool::new(true),
            in_flight: AtomicBool::new(false),
            stop: Notify::new(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Receiver notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<RefreshState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> RefreshState {
        self.state_tx.borrow().clone()
    }

    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.state_tx.borrow().snapshot.clone()
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Run exactly one fetch cycle.
    ///
    /// At most one fetch is outstanding: a call made while another cycle
    /// (including the one driven by [`Self::run`]) is in flight returns
    /// [`CycleOutcome::Skipped`] without fetching.
    pub async fn refresh_once(&self) -> CycleOutcome {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            tracing::debug!(source = %self.source.describe(), "cycle already in flight");
            return CycleOutcome::Skipped;
        }
        let _in_flight = InFlight(&self.in_flight);

        let mut started = false;
        self.state_tx.send_if_modified(|state| {
            started = self.alive.load(Ordering::SeqCst);
            if !started {
                return false;
            }
            let next = match state.phase {
                RefreshPhase::Uninitialized => RefreshPhase::Loading,
                RefreshPhase::Ready => RefreshPhase::Refreshing,
                other => other,
            };
            let changed = next != state.phase;
            state.phase = next;
            changed
        });
        if !started {
            return CycleOutcome::Discarded;
        }

        let result = self.source.fetch().await;
        let failure = result.as_ref().err().map(|e| (e.kind(), e.to_string()));

        let mut outcome = CycleOutcome::Discarded;
        let mut observations = 0;
        // The liveness check runs under the state lock, which shutdown() also
        // takes, so no result lands after shutdown() has returned.
        self.state_tx.send_if_modified(|state| {
            if !self.alive.load(Ordering::SeqCst) {
                return false;
            }
            state.phase = RefreshPhase::Ready;
            state.cycles += 1;
            match result {
                Ok(snapshot) => {
                    outcome = CycleOutcome::Applied {
                        users: snapshot.len(),
                    };
                    observations = snapshot.observation_count();
                    state.snapshot = Some(Arc::new(snapshot));
                    state.last_success_at = Some(Utc::now());
                    state.last_error = None;
                }
                Err(_) => {
                    outcome = CycleOutcome::Failed;
                    state.failures += 1;
                    state.last_error = failure.as_ref().map(|(_, message)| message.clone());
                }
            }
            true
        });

        match (outcome, failure) {
            (CycleOutcome::Applied { users }, _) => {
                tracing::info!(
                    source = %self.source.describe(),
                    users,
                    observations,
                    "snapshot refreshed"
                );
            }
            (CycleOutcome::Failed, Some((kind, message))) => {
                tracing::warn!(
                    source = %self.source.describe(),
                    kind,
                    error = %message,
                    "snapshot refresh failed, keeping previous state"
                );
            }
            _ => {
                tracing::debug!(
                    source = %self.source.describe(),
                    "discarding fetch result after shutdown"
                );
            }
        }

        outcome
    }

    /// Refresh on the fixed interval until [`Self::shutdown`] is called.
    pub async fn run(&self) {
        tracing::info!(
            source = %self.source.describe(),
            interval_secs = self.interval.as_secs(),
            "refresh loop started"
        );

        while self.is_alive() {
            self.refresh_once().await;

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = self.stop.notified() => break,
            }
        }

        tracing::info!("refresh loop stopped");
    }

    /// Stop the schedule and drop any in-flight result. Idempotent.
    pub fn shutdown(&self) {
        self.state_tx.send_if_modified(|_| {
            self.alive.store(false, Ordering::SeqCst);
            false
        });
        self.stop.notify_one();
    }
}

impl<S: SnapshotSource + 'static> RefreshController<S> {
    /// Run the loop on the tokio runtime.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }
}
