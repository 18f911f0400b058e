//! Error types for action validation.

use std::fmt;

use crate::game::{Coord, PlayerId, Spell};

/// Why an action was not applied.
///
/// Every variant is a rejection: the game state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// The action kind is not one of `skip`, `spell`, `move`, `attack`.
    UnknownKind(String),
    /// The spell code is not one of `fs`, `hv`, `af`, `dt`, `ms`.
    UnknownSpell(String),
    /// A coordinate the action kind requires was not supplied.
    MissingCoordinate(&'static str),
    /// A coordinate lies off the board.
    OutOfBounds {
        /// Requested row.
        row: i64,
        /// Requested column.
        col: i64,
    },
    /// The submitting player is not seated in this game.
    UnknownPlayer(PlayerId),
    /// The submitting player is not the active player.
    NotYourTurn {
        /// Player that submitted the action.
        player: PlayerId,
        /// Player whose turn it is.
        active: PlayerId,
    },
    /// A move tried to cross the border between halves.
    CrossesBorder {
        /// Source cell.
        from: Coord,
        /// Destination cell.
        to: Coord,
    },
    /// The attack is not legal (not two elementals, same half, or out of reach).
    IllegalAttack {
        /// Attacking cell.
        from: Coord,
        /// Target cell.
        to: Coord,
    },
    /// The spell target lies in the wrong half.
    WrongHalf {
        /// Spell being cast.
        spell: Spell,
        /// Requested target.
        target: Coord,
    },
    /// The spell needs an elemental at the target.
    NotElemental(Coord),
    /// The spell has no charge (only when charges are enforced).
    NoCharge(Spell),
}

impl ActionError {
    /// Whether the rejection came from malformed input rather than game rules.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::UnknownKind(_)
                | Self::UnknownSpell(_)
                | Self::MissingCoordinate(_)
                | Self::OutOfBounds { .. }
        )
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKind(kind) => write!(f, "unknown action kind {kind:?}"),
            Self::UnknownSpell(code) => write!(f, "unknown spell {code:?}"),
            Self::MissingCoordinate(field) => write!(f, "missing coordinate `{field}`"),
            Self::OutOfBounds { row, col } => write!(f, "cell ({row}, {col}) is off the board"),
            Self::UnknownPlayer(player) => write!(f, "player {player} is not seated"),
            Self::NotYourTurn { player, active } => {
                write!(f, "player {player} acted during player {active}'s turn")
            }
            Self::CrossesBorder { from, to } => write!(
                f,
                "cannot move from ({}, {}) to ({}, {}) across the border",
                from.row, from.col, to.row, to.col
            ),
            Self::IllegalAttack { from, to } => write!(
                f,
                "({}, {}) cannot attack ({}, {})",
                from.row, from.col, to.row, to.col
            ),
            Self::WrongHalf { spell, target } => write!(
                f,
                "{} cannot target ({}, {})",
                spell.name(),
                target.row,
                target.col
            ),
            Self::NotElemental(target) => {
                write!(f, "no elemental at ({}, {})", target.row, target.col)
            }
            Self::NoCharge(spell) => write!(f, "{} has no charge", spell.name()),
        }
    }
}

impl std::error::Error for ActionError {}

/// Result type for action resolution.
pub type ActionResult<T> = Result<T, ActionError>;
