use clap::{Parser, Subcommand};
use leetboard_core::{logging, Config};

mod commands;

#[derive(Parser)]
#[command(name = "leetboard", version, about = "Leetboard CLI")]
struct Cli {
    /// Log level filter (overrides config; RUST_LOG wins over both)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Users ranked by latest solved count
    Leaderboard(commands::view::ViewArgs),
    /// Per-user counts aligned on a shared time axis
    Series(commands::view::ViewArgs),
    /// Latest easy/medium/hard split per user
    Difficulty(commands::view::ViewArgs),
    /// All projections of one snapshot as JSON
    Report(commands::view::SourceArgs),
    /// Keep refreshing and print the leaderboard after each refresh
    Watch(commands::watch::WatchArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    logging::init_tracing(cli.log_level.as_deref().unwrap_or(&config.log.level));

    let result = match cli.command {
        Commands::Leaderboard(args) => {
            commands::view::run(commands::view::View::Leaderboard, args, &config).await
        }
        Commands::Series(args) => {
            commands::view::run(commands::view::View::Series, args, &config).await
        }
        Commands::Difficulty(args) => {
            commands::view::run(commands::view::View::Difficulty, args, &config).await
        }
        Commands::Report(source) => commands::view::run_report(source, &config).await,
        Commands::Watch(args) => commands::watch::run(args, &config).await,
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
