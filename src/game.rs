//! Game layer for Elementa.
//!
//! Implements the rules engine:
//! - Board with empty, block and elemental cells
//! - Triple-match ascension (merge) and border collapse
//! - Combat, spells and per-player charge pools
//! - Turn controller and action resolution

mod actions;
mod board;
mod collapse;
mod combat;
mod invariants;
mod merge;
mod player;
mod setup;
mod spells;
mod state;

pub use actions::{Action, ActionOutcome};
pub use board::{
    attack_damage, attack_reach, base_health, half, half_rows, same_half, valid, Board, Cell,
    CellType, Coord, Element, HALF_SIZE, MAX_LEVEL, SIZE,
};
pub use collapse::{collapse_border, collapse_targets, COLLAPSE_STEPS};
pub use combat::{apply_damage, can_attack, has_attack_target, DamageOutcome};
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use merge::{merge_half, MergeOutcome};
pub use player::{opponent, PlayerId, ResourcePool, PLAYER_COUNT};
pub use setup::{MAX_ELEMENTALS, MIN_ELEMENTALS};
pub use spells::{Cast, Spell};
pub use state::{GameState, RuleConfig, TurnReport};
