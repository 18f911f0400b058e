//! Scripted games.
//!
//! A script is a JSON-lines file. The first line is a header naming the
//! seed of the initial board; every following line is one action submitted
//! on behalf of a seat:
//!
//! ```text
//! {"seed": 42}
//! {"player": 0, "action": {"type": "move", "from": {"row": 5, "col": 3}, "to": {"row": 4, "col": 3}}}
//! {"player": 1, "action": {"type": "skip"}}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::game::{assert_invariants, GameState, PlayerId, RuleConfig};
use crate::snapshot::GameSoa;
use crate::wire::{respond, ActionRequest};

/// Script loading errors.
#[derive(Debug)]
pub enum ScriptError {
    /// The file could not be read.
    Io(std::io::Error),
    /// A line is not valid JSON of the expected shape.
    Parse {
        /// 1-based line number.
        line: usize,
        /// Parser message.
        message: String,
    },
    /// The script has no header line.
    MissingHeader,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Parse { line, message } => write!(f, "line {line}: {message}"),
            Self::MissingHeader => write!(f, "script has no header line"),
        }
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ScriptError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[derive(Debug, Deserialize)]
struct Header {
    seed: u64,
    #[serde(default)]
    require_charge: bool,
}

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Seat submitting the action.
    pub player: PlayerId,
    /// The action as a client would send it.
    pub action: ActionRequest,
}

/// A seeded game plus the actions to play on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    /// Seed of the initial board.
    pub seed: u64,
    /// Rule switches.
    pub rules: RuleConfig,
    /// Actions in submission order.
    pub steps: Vec<ScriptStep>,
}

/// Outcome of one scripted action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    /// Seat that submitted the action.
    pub player: PlayerId,
    /// Whether the action was applied.
    pub ok: bool,
    /// Turn after the action.
    pub turn: u32,
    /// Active player after the action.
    pub active_player: PlayerId,
}

/// Outcome of a whole script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptReport {
    /// Per-step outcomes.
    pub steps: Vec<StepResult>,
    /// Number of applied actions.
    pub accepted: usize,
    /// Number of rejected actions.
    pub rejected: usize,
    /// Seat whose opponent has no elementals left, if any.
    pub winner: Option<PlayerId>,
    /// Final snapshot.
    pub final_state: GameSoa,
}

fn parse_line<'a, T: Deserialize<'a>>(line: usize, text: &'a str) -> Result<T, ScriptError> {
    serde_json::from_str(text).map_err(|e| ScriptError::Parse {
        line,
        message: e.to_string(),
    })
}

impl Script {
    /// Create a script with no steps.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rules: RuleConfig::default(),
            steps: Vec::new(),
        }
    }

    /// Parse a script from JSON-lines text.
    ///
    /// # Errors
    ///
    /// Returns an error if the header is missing or a line does not parse.
    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

        let (number, header) = lines.next().ok_or(ScriptError::MissingHeader)?;
        let header: Header = parse_line(number, header)?;

        let steps = lines
            .map(|(number, line)| parse_line(number, line))
            .collect::<Result<Vec<ScriptStep>, _>>()?;

        Ok(Self {
            seed: header.seed,
            rules: RuleConfig {
                require_charge: header.require_charge,
            },
            steps,
        })
    }

    /// Load a script from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// The initial game this script starts from.
    #[must_use]
    pub fn initial_state(&self) -> GameState {
        GameState::initial(self.seed).with_rules(self.rules)
    }

    /// Play every step on a fresh game.
    #[must_use]
    pub fn run(&self) -> ScriptReport {
        let mut state = self.initial_state();
        let mut steps = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            let response = respond(&mut state, step.player, &step.action);
            assert_invariants(&state);
            steps.push(StepResult {
                player: step.player,
                ok: response.ok,
                turn: state.turn,
                active_player: state.active_player,
            });
        }

        let accepted = steps.iter().filter(|step| step.ok).count();
        tracing::info!(
            seed = self.seed,
            accepted,
            rejected = steps.len() - accepted,
            turn = state.turn,
            "script finished"
        );

        ScriptReport {
            accepted,
            rejected: steps.len() - accepted,
            steps,
            winner: state.winner(),
            final_state: GameSoa::from(&state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Action;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let text = "# opening\n{\"seed\": 5}\n\n{\"player\": 0, \"action\": {\"type\": \"skip\"}}\n";
        let script = Script::parse(text).unwrap();
        assert_eq!(script.seed, 5);
        assert!(!script.rules.require_charge);
        assert_eq!(script.steps.len(), 1);
        assert_eq!(script.steps[0].action.parse(), Ok(Action::Skip));
    }

    #[test]
    fn test_parse_errors_name_the_line() {
        assert!(matches!(Script::parse("\n# nothing\n"), Err(ScriptError::MissingHeader)));

        let err = Script::parse("{\"seed\": 1}\n{\"player\": 0}\n").unwrap_err();
        assert!(matches!(err, ScriptError::Parse { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_run_counts_outcomes() {
        let mut script = Script::new(8);
        for player in [0, 0, 1] {
            script.steps.push(ScriptStep {
                player,
                action: ActionRequest::from(&Action::Skip),
            });
        }

        let report = script.run();
        assert_eq!(report.accepted, 2);
        assert_eq!(report.rejected, 1);
        assert!(!report.steps[1].ok);
        assert_eq!(report.final_state.turn, 3);
        assert_eq!(report.final_state.active_player, 0);
    }
}
