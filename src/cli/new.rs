//! New command implementation.

use super::{CliError, OutputFormat};
use elementa::render::render_text;
use elementa::{GameSoa, GameState};

/// Execute the new command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub(crate) fn execute(seed: Option<u64>, format: OutputFormat) -> Result<(), CliError> {
    let seed = seed.unwrap_or_else(rand::random);
    let game = GameState::initial(seed);
    tracing::info!(seed, "generated game");

    match format {
        OutputFormat::Text => {
            println!("Seed: {seed}");
            print!("{}", render_text(&game));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&GameSoa::from(&game))?;
            println!("{json}");
        }
    }

    Ok(())
}
