//! Play command implementation.

use super::output::format_report_text;
use super::{CliError, OutputFormat};
use elementa::render::render_text;
use elementa::script::Script;
use elementa::{respond, GameState};
use std::path::Path;

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the script cannot be loaded or the output fails.
pub(crate) fn execute(script: &Path, format: OutputFormat, boards: bool) -> Result<(), CliError> {
    let script = Script::load(script)
        .map_err(|e| CliError::new(format!("Failed to load {}: {e}", script.display())))?;

    if boards && format == OutputFormat::Text {
        print_boards(&script);
    }

    let report = script.run();

    match format {
        OutputFormat::Text => {
            let final_state = GameState::from(&report.final_state);
            print!("{}", format_report_text(&report, &final_state));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

/// Step through the script, printing the board after each action.
fn print_boards(script: &Script) {
    let mut state = script.initial_state();
    println!("Initial board (seed {})", script.seed);
    print!("{}", render_text(&state));

    for (i, step) in script.steps.iter().enumerate() {
        let response = respond(&mut state, step.player, &step.action);
        let verdict = if response.ok { "ok" } else { "rejected" };
        println!();
        println!("Step {}: player {} {} ({verdict})", i + 1, step.player, step.action.kind);
        print!("{}", render_text(&state));
    }
    println!();
}
