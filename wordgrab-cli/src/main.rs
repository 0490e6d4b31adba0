//! WordGrab CLI - Command-line interface
//!
//! Commands:
//! - match: Play computer personalities against each other
//! - suggest: Ask the AI for a move in a saved game
//! - check: Validate (and optionally apply) a move to a saved game

mod check_cmd;
mod config;
mod match_cmd;
mod suggest_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "wordgrab")]
#[command(about = "WordGrab word game engine tools")]
struct Cli {
    /// Seed for reproducible runs (random when omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play AI personalities against each other
    Match(match_cmd::MatchArgs),
    /// Print the AI's move for a saved game
    Suggest(suggest_cmd::SuggestArgs),
    /// Validate a move against a saved game
    Check(check_cmd::CheckArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Match(args) => match_cmd::run(args, cli.seed),
        Commands::Suggest(args) => suggest_cmd::run(args, cli.seed),
        Commands::Check(args) => check_cmd::run(args),
    }
}
