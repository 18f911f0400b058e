//! Output formatting utilities for CLI.

use elementa::render::render_text;
use elementa::script::ScriptReport;
use elementa::simulate::SimulationStats;
use elementa::GameState;
use serde::Serialize;
use std::fmt::Write as _;
use std::time::Duration;

/// JSON-serializable simulation summary.
#[derive(Debug, Serialize)]
pub(super) struct JsonSimulationSummary {
    /// First seed of the batch.
    pub(super) base_seed: u64,
    /// Raw totals.
    pub(super) stats: SimulationStats,
    /// Mean turn reached per game.
    pub(super) mean_turns: f64,
    /// Wall-clock time in seconds.
    pub(super) duration_secs: f64,
}

impl JsonSimulationSummary {
    pub(super) fn new(stats: SimulationStats, base_seed: u64, duration: Duration) -> Self {
        Self {
            base_seed,
            mean_turns: stats.mean_turns(),
            stats,
            duration_secs: duration.as_secs_f64(),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

/// Format aggregated simulation totals as human-readable text.
pub(super) fn format_simulation_text(stats: &SimulationStats, base_seed: u64, duration: Duration) -> String {
    let mut output = String::new();
    let games = stats.games_played;

    let _ = writeln!(output, "Simulation Results ({games} games, base seed {base_seed})");
    for (seat, wins) in stats.wins.iter().enumerate() {
        let _ = writeln!(output, "  Player {seat} wins: {wins} ({:.1}%)", percent(*wins, games));
    }
    let _ = writeln!(
        output,
        "  Undecided:     {} ({:.1}%)",
        stats.undecided,
        percent(stats.undecided, games)
    );
    let _ = writeln!(output, "  Mean turns:    {:.1}", stats.mean_turns());
    let _ = writeln!(
        output,
        "  Actions:       {} accepted, {} rejected",
        stats.accepted, stats.rejected
    );
    let _ = writeln!(output, "  Charge yield:  {}", stats.charge_yield);

    let secs = duration.as_secs_f64();
    let _ = write!(output, "  Time:          {secs:.2}s");
    if secs > 0.0 {
        #[allow(clippy::cast_precision_loss)]
        let rate = games as f64 / secs;
        let _ = write!(output, " ({rate:.0} games/s)");
    }
    output.push('\n');

    output
}

/// Format a script report as human-readable text, followed by the final board.
pub(super) fn format_report_text(report: &ScriptReport, final_state: &GameState) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Script Result ({} steps)", report.steps.len());
    for (i, step) in report.steps.iter().enumerate() {
        let verdict = if step.ok { "ok" } else { "rejected" };
        let _ = writeln!(
            output,
            "  {:>3}. player {} {verdict:<8} turn {} next {}",
            i + 1,
            step.player,
            step.turn,
            step.active_player
        );
    }
    let _ = writeln!(
        output,
        "  Accepted: {}  Rejected: {}",
        report.accepted, report.rejected
    );
    match report.winner {
        Some(winner) => {
            let _ = writeln!(output, "  Winner: Player {winner}");
        }
        None => output.push_str("  Winner: none yet\n"),
    }
    output.push('\n');
    output.push_str(&render_text(final_state));

    output
}
