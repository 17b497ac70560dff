use std::fmt::Write as _;
use std::path::PathBuf;

use clap::Args;
use leetboard_core::{
    AlignedSeries, AnySource, Config, DifficultySnapshot, Leaderboard, ProgressReport, Snapshot,
    SnapshotSource,
};

use super::CliResult;

/// Where to read the snapshot from. Defaults to the configured `source.url`.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Read the snapshot from a local JSON file
    #[arg(long, conflicts_with = "url")]
    pub file: Option<PathBuf>,
    /// Fetch the snapshot from this URL
    #[arg(long)]
    pub url: Option<String>,
}

impl SourceArgs {
    pub fn resolve(&self, config: &Config) -> Result<AnySource, leetboard_core::FetchError> {
        AnySource::resolve(self.file.as_deref(), self.url.as_deref(), &config.source)
    }
}

#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Leaderboard,
    Series,
    Difficulty,
}

async fn fetch(source: &SourceArgs, config: &Config) -> leetboard_core::error::Result<Snapshot> {
    let source = source.resolve(config)?;
    tracing::debug!(source = %source.describe(), "one-shot fetch");
    Ok(source.fetch().await?)
}

pub async fn run(view: View, args: ViewArgs, config: &Config) -> CliResult {
    let snapshot = fetch(&args.source, config).await?;

    let output = match view {
        View::Leaderboard => {
            let board = Leaderboard::from_snapshot(&snapshot);
            if args.json {
                serde_json::to_string_pretty(&board)?
            } else {
                render_leaderboard(&board)
            }
        }
        View::Series => {
            let aligned = AlignedSeries::from_snapshot(&snapshot);
            if args.json {
                serde_json::to_string_pretty(&aligned)?
            } else {
                render_series(&aligned)
            }
        }
        View::Difficulty => {
            let difficulty = DifficultySnapshot::from_snapshot(&snapshot);
            if args.json {
                serde_json::to_string_pretty(&difficulty)?
            } else {
                render_difficulty(&difficulty)
            }
        }
    };

    println!("{}", output.trim_end());
    Ok(())
}

pub async fn run_report(source: SourceArgs, config: &Config) -> CliResult {
    let snapshot = fetch(&source, config).await?;
    let report = ProgressReport::from_snapshot(&snapshot);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

const NO_DATA: &str = "no data";

pub fn render_leaderboard(board: &Leaderboard) -> String {
    if board.is_empty() {
        return NO_DATA.to_string();
    }

    let width = board
        .rows()
        .iter()
        .map(|row| row.user.len())
        .max()
        .unwrap_or(0)
        .max("USER".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<5} {:<width$} {:>7} {:>6}  LAST UPDATED",
        "RANK", "USER", "SOLVED", "GAIN"
    );
    for row in board {
        let _ = writeln!(
            out,
            "{:<5} {:<width$} {:>7} {:>6}  {}",
            format!("#{}", row.rank),
            row.user,
            row.latest_count,
            row.gain_label(),
            row.last_updated
        );
    }
    out
}

pub fn render_series(aligned: &AlignedSeries) -> String {
    if aligned.is_empty() {
        return NO_DATA.to_string();
    }

    let label_width = aligned
        .labels
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max("LABEL".len());

    let mut out = String::new();
    let _ = write!(out, "{:<label_width$}", "LABEL");
    for user in aligned.series.keys() {
        let _ = write!(out, "  {user:>8}");
    }
    out.push('\n');

    for (i, label) in aligned.labels.iter().enumerate() {
        let label = if label.is_empty() { "-" } else { label.as_str() };
        let _ = write!(out, "{label:<label_width$}");
        for points in aligned.series.values() {
            match points.get(i).copied().flatten() {
                Some(count) => {
                    let _ = write!(out, "  {count:>8}");
                }
                None => {
                    let _ = write!(out, "  {:>8}", "-");
                }
            }
        }
        out.push('\n');
    }
    out
}

pub fn render_difficulty(difficulty: &DifficultySnapshot) -> String {
    if !difficulty.has_difficulty_data {
        return "no difficulty data".to_string();
    }

    let width = difficulty
        .by_user
        .keys()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max("USER".len());

    let mut out = String::new();
    let _ = writeln!(out, "{:<width$} {:>6} {:>6} {:>6}", "USER", "EASY", "MEDIUM", "HARD");
    for (user, split) in &difficulty.by_user {
        let _ = writeln!(
            out,
            "{:<width$} {:>6} {:>6} {:>6}",
            user, split.easy, split.medium, split.hard
        );
    }
    out
}
