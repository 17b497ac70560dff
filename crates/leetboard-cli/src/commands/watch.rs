use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use leetboard_core::{Config, CoreError, Leaderboard, RefreshController, SnapshotSource};
use serde::Serialize;

use super::view::{render_leaderboard, SourceArgs};
use super::CliResult;

#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Seconds between refreshes (defaults to refresh.interval_secs)
    #[arg(long)]
    pub interval: Option<u64>,
    /// Exit after this many refresh cycles
    #[arg(long)]
    pub limit: Option<u64>,
    /// Print one JSON line per refresh instead of a table
    #[arg(long)]
    pub json: bool,
}

/// One line of `watch --json` output.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WatchTick<'a> {
    cycle: u64,
    leaderboard: &'a Leaderboard,
}

pub async fn run(args: WatchArgs, config: &Config) -> CliResult {
    let interval = match args.interval {
        Some(0) => {
            return Err(CoreError::Custom(
                "--interval must be at least 1 second".to_string(),
            ))
        }
        Some(secs) => Duration::from_secs(secs),
        None => config.refresh_interval(),
    };

    let source = args.source.resolve(config)?;
    let controller = Arc::new(RefreshController::new(source, interval));
    tracing::info!(
        source = %controller.source().describe(),
        interval_secs = controller.interval().as_secs(),
        "watching snapshot"
    );

    let mut rx = controller.subscribe();
    let handle = controller.clone().spawn();

    let mut seen_cycles = 0;
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = rx.borrow_and_update().clone();
                // phase-only transitions
                if state.cycles == seen_cycles {
                    continue;
                }
                seen_cycles = state.cycles;

                if state.last_error.is_none() {
                    if let Some(snapshot) = &state.snapshot {
                        let board = Leaderboard::from_snapshot(snapshot);
                        if args.json {
                            let tick = WatchTick { cycle: state.cycles, leaderboard: &board };
                            println!("{}", serde_json::to_string(&tick)?);
                        } else {
                            println!("{}", render_leaderboard(&board).trim_end());
                            println!();
                        }
                    }
                }

                if args.limit.is_some_and(|limit| seen_cycles >= limit) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        }
    }

    controller.shutdown();
    handle
        .await
        .map_err(|e| CoreError::Custom(format!("refresh task failed: {e}")))?;
    Ok(())
}
