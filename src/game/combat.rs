//! Damage and attack legality.
//!
//! A killed elemental demotes one level (back to that level's full health)
//! instead of disappearing; only a level-1 elemental is removed outright.
//! Blocks hold no health, so any hit breaks them.

use crate::game::{attack_reach, base_health, half, Board, Cell, CellType, Coord, SIZE};

/// What a hit did to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The cell was already empty; nothing happened.
    Unaffected,
    /// A block was broken and the cell is now empty.
    Cleared,
    /// Health went down, level unchanged.
    Wounded,
    /// Health ran out and the elemental dropped one level.
    Demoted,
    /// Health ran out at level 1 and the cell is now empty.
    Destroyed,
}

/// Apply `damage` to a cell.
///
/// A block is cleared by any hit, even one of zero damage. Empty cells stay empty.
pub fn apply_damage(cell: &mut Cell, damage: u8) -> DamageOutcome {
    match cell.kind {
        CellType::Empty => return DamageOutcome::Unaffected,
        CellType::Block => {
            *cell = Cell::EMPTY;
            return DamageOutcome::Cleared;
        }
        CellType::Elemental => {}
    }

    if cell.health > damage {
        cell.health -= damage;
        return DamageOutcome::Wounded;
    }

    cell.level = cell.level.saturating_sub(1);
    if cell.level == 0 {
        *cell = Cell::EMPTY;
        DamageOutcome::Destroyed
    } else {
        cell.health = base_health(cell.level);
        DamageOutcome::Demoted
    }
}

/// Check whether the elemental at `from` may attack the cell at `to`.
///
/// Both cells must hold elementals in opposite halves, at most one column
/// apart and within the attacker's reach in rows.
#[must_use]
pub fn can_attack(board: &Board, from: Coord, to: Coord) -> bool {
    let (Some(attacker), Some(target)) = (board.get(from), board.get(to)) else {
        return false;
    };
    if !attacker.is_elemental() || !target.is_elemental() {
        return false;
    }

    let reach = usize::from(attack_reach(attacker.level));
    half(from.row) != half(to.row)
        && from.col.abs_diff(to.col) <= 1
        && from.row.abs_diff(to.row) <= reach
}

/// Check whether the elemental at `from` has at least one legal target.
#[must_use]
pub fn has_attack_target(board: &Board, from: Coord) -> bool {
    let Some(attacker) = board.get(from) else {
        return false;
    };
    if !attacker.is_elemental() {
        return false;
    }

    let reach = usize::from(attack_reach(attacker.level));
    let rows = from.row.saturating_sub(reach)..=(from.row + reach).min(SIZE - 1);
    let cols = from.col.saturating_sub(1)..=(from.col + 1).min(SIZE - 1);

    rows.flat_map(|row| cols.clone().map(move |col| Coord::new(row, col)))
        .any(|to| can_attack(board, from, to))
}
