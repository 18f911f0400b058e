//! Elementa CLI - generate, script and simulate elemental battles.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Elementa - a rules engine for a two-player elemental territory battle
#[derive(Parser, Debug)]
#[command(name = "elementa")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log filter, e.g. `info` or `elementa=debug` (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a fresh game and print it
    New {
        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Play a JSON-lines action script
    Play {
        /// Script file
        #[arg(required = true)]
        script: PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Print the board after every step
        #[arg(short, long)]
        boards: bool,
    },

    /// Run random self-play games in parallel and aggregate statistics
    Simulate {
        /// Number of games to run (default: 1000)
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Starting seed (increments for each game)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Actions submitted per game (default: 500)
        #[arg(short = 'a', long)]
        max_actions: Option<u32>,

        /// Reject spells whose charge counter is empty
        #[arg(long)]
        require_charge: bool,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    let result = match args.command {
        Commands::New { seed, format } => cli::new::execute(seed, format),

        Commands::Play {
            script,
            format,
            boards,
        } => cli::play::execute(&script, format, boards),

        Commands::Simulate {
            games,
            seed,
            threads,
            max_actions,
            require_charge,
            format,
            progress,
        } => cli::simulate::execute(&cli::simulate::SimulateArgs {
            games,
            seed,
            threads,
            max_actions,
            require_charge,
            format,
            progress,
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
