//! Simulate command implementation.

use super::output::{format_simulation_text, JsonSimulationSummary};
use super::{CliError, OutputFormat};
use elementa::simulate::{run_game, SimulationConfig, SimulationStats};
use elementa::RuleConfig;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::time::Instant;

/// Arguments of the simulate command.
#[derive(Debug)]
pub(crate) struct SimulateArgs {
    pub(crate) games: u64,
    pub(crate) seed: Option<u64>,
    pub(crate) threads: Option<usize>,
    pub(crate) max_actions: Option<u32>,
    pub(crate) require_charge: bool,
    pub(crate) format: OutputFormat,
    pub(crate) progress: bool,
}

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the progress bar or the output fails.
pub(crate) fn execute(args: &SimulateArgs) -> Result<(), CliError> {
    // Set thread pool size if specified
    if let Some(num_threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = args.seed.unwrap_or_else(rand::random);

    let mut config = SimulationConfig {
        rules: RuleConfig {
            require_charge: args.require_charge,
        },
        ..SimulationConfig::default()
    };
    if let Some(max_actions) = args.max_actions {
        config.max_actions = max_actions;
    }

    let pb = if args.progress {
        let pb = ProgressBar::new(args.games);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")
                .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Each thread folds into its own stats; the partial totals are merged at the end.
    let stats = (0..args.games)
        .into_par_iter()
        .fold(SimulationStats::default, |mut local, i| {
            let result = run_game(base_seed.wrapping_add(i), &config);
            local.add_result(&result);
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            local
        })
        .reduce(SimulationStats::default, |mut a, b| {
            a.merge(&b);
            a
        });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    tracing::info!(games = stats.games_played, seconds = duration.as_secs_f64(), "simulation complete");

    match args.format {
        OutputFormat::Text => {
            println!();
            print!("{}", format_simulation_text(&stats, base_seed, duration));
        }
        OutputFormat::Json => {
            let summary = JsonSimulationSummary::new(stats, base_seed, duration);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
