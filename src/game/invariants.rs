//! Game invariants - sanity checks that detect bugs.
//!
//! No sequence of accepted or rejected actions should ever trigger these.
//! If one does, a rule implementation is wrong.

use crate::game::{base_health, CellType, GameState, MAX_LEVEL, PLAYER_COUNT};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut push = |message: String| violations.push(InvariantViolation { message });

    for (coord, cell) in state.board.iter() {
        match cell.kind {
            CellType::Elemental => {
                if cell.element.is_none() {
                    push(format!("Elemental at {coord:?} has no element"));
                }
                if cell.level == 0 || cell.level > MAX_LEVEL {
                    push(format!("Elemental at {coord:?} has level {}", cell.level));
                } else if cell.health == 0 || cell.health > base_health(cell.level) {
                    push(format!(
                        "Elemental at {coord:?} has health {} at level {}",
                        cell.health, cell.level
                    ));
                }
            }
            CellType::Empty | CellType::Block => {
                if cell.element.is_some() || cell.health != 0 || cell.level != 0 {
                    push(format!("{:?} cell at {coord:?} carries unit data", cell.kind));
                }
            }
        }
    }

    for (player, pool) in state.pools.iter().enumerate() {
        if !pool.within_caps() {
            push(format!("Player {player} pool {:?} exceeds caps", pool.charges()));
        }
    }

    if state.turn == 0 {
        push("Turn counter is 0".to_string());
    }
    if usize::from(state.active_player) >= PLAYER_COUNT {
        push(format!("Active player {} is not seated", state.active_player));
    }
    if state.pending_skip > 1 {
        push(format!("Pending skip {} > 1", state.pending_skip));
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &GameState) {}
