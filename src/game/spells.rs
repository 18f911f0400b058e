//! Spells and their board effects.
//!
//! Every spell except Double Turn targets a single cell. Targeting is
//! validated by [`Cast::validate`] before the effect touches the board,
//! so a rejected cast never leaves partial damage behind.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ActionError, ActionResult};
use crate::game::{apply_damage, base_health, half_rows, Board, Coord, PlayerId, SIZE};

/// The five spells, in charge-pool order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Spell {
    /// Deals 2 damage to one cell in the caster's half.
    #[serde(rename = "fs")]
    ForestStaff,
    /// Restores one elemental in the opponent's half to full health.
    #[serde(rename = "hv")]
    HealingVial,
    /// Deals 1 damage along a column (own half) and a row (whole board).
    #[serde(rename = "af")]
    AncientFigurine,
    /// Suppresses the next turn hand-over.
    #[serde(rename = "dt")]
    DoubleTurn,
    /// Deals 4 damage to a 3×3 area in the caster's half.
    #[serde(rename = "ms")]
    MeteorShower,
}

impl Spell {
    /// Number of spells.
    pub const COUNT: usize = 5;

    /// All spells in charge-pool order.
    pub const ALL: [Spell; Spell::COUNT] = [
        Spell::ForestStaff,
        Spell::HealingVial,
        Spell::AncientFigurine,
        Spell::DoubleTurn,
        Spell::MeteorShower,
    ];

    /// Position of this spell's counter in a resource pool.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Spell::ForestStaff => 0,
            Spell::HealingVial => 1,
            Spell::AncientFigurine => 2,
            Spell::DoubleTurn => 3,
            Spell::MeteorShower => 4,
        }
    }

    /// Maximum charge this spell's counter can hold.
    #[must_use]
    pub const fn cap(self) -> u8 {
        match self {
            Spell::ForestStaff => 4,
            Spell::HealingVial => 5,
            Spell::AncientFigurine => 7,
            Spell::DoubleTurn => 9,
            Spell::MeteorShower => 10,
        }
    }

    /// Damage dealt per affected cell, if the spell damages at all.
    #[must_use]
    pub const fn damage(self) -> Option<u8> {
        match self {
            Spell::ForestStaff => Some(2),
            Spell::AncientFigurine => Some(1),
            Spell::MeteorShower => Some(4),
            Spell::HealingVial | Spell::DoubleTurn => None,
        }
    }

    /// Wire code (`fs`, `hv`, `af`, `dt`, `ms`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Spell::ForestStaff => "fs",
            Spell::HealingVial => "hv",
            Spell::AncientFigurine => "af",
            Spell::DoubleTurn => "dt",
            Spell::MeteorShower => "ms",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Spell::ForestStaff => "Forest Staff",
            Spell::HealingVial => "Healing Vial",
            Spell::AncientFigurine => "Ancient Figurine",
            Spell::DoubleTurn => "Double Turn",
            Spell::MeteorShower => "Meteor Shower",
        }
    }
}

impl fmt::Display for Spell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Spell {
    type Err = ActionError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Spell::ALL
            .into_iter()
            .find(|spell| spell.code() == code)
            .ok_or_else(|| ActionError::UnknownSpell(code.to_string()))
    }
}

/// A spell paired with its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cast {
    /// Forest Staff on a cell.
    ForestStaff(Coord),
    /// Healing Vial on a cell.
    HealingVial(Coord),
    /// Ancient Figurine centred on a cell.
    AncientFigurine(Coord),
    /// Double Turn (untargeted).
    DoubleTurn,
    /// Meteor Shower centred on a cell.
    MeteorShower(Coord),
}

impl Cast {
    /// Pair a spell with an optional target.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::MissingCoordinate`] if a targeted spell has no target.
    /// The target of Double Turn is ignored.
    pub fn new(spell: Spell, target: Option<Coord>) -> ActionResult<Self> {
        if spell == Spell::DoubleTurn {
            return Ok(Cast::DoubleTurn);
        }
        let target = target.ok_or(ActionError::MissingCoordinate("to"))?;
        Ok(match spell {
            Spell::ForestStaff => Cast::ForestStaff(target),
            Spell::HealingVial => Cast::HealingVial(target),
            Spell::AncientFigurine => Cast::AncientFigurine(target),
            Spell::MeteorShower => Cast::MeteorShower(target),
            Spell::DoubleTurn => Cast::DoubleTurn,
        })
    }

    /// The spell being cast.
    #[must_use]
    pub const fn spell(&self) -> Spell {
        match self {
            Cast::ForestStaff(_) => Spell::ForestStaff,
            Cast::HealingVial(_) => Spell::HealingVial,
            Cast::AncientFigurine(_) => Spell::AncientFigurine,
            Cast::DoubleTurn => Spell::DoubleTurn,
            Cast::MeteorShower(_) => Spell::MeteorShower,
        }
    }

    /// The targeted cell, if any.
    #[must_use]
    pub const fn target(&self) -> Option<Coord> {
        match *self {
            Cast::ForestStaff(target)
            | Cast::HealingVial(target)
            | Cast::AncientFigurine(target)
            | Cast::MeteorShower(target) => Some(target),
            Cast::DoubleTurn => None,
        }
    }

    /// Check targeting rules for `caster` without touching the board.
    ///
    /// # Errors
    ///
    /// Returns an error if the target is off the board, in the wrong half,
    /// or (for Healing Vial) not an elemental.
    pub fn validate(&self, board: &Board, caster: PlayerId) -> ActionResult<()> {
        let Some(target) = self.target() else {
            return Ok(());
        };
        if !target.in_bounds() {
            return Err(out_of_bounds(target));
        }

        let wants_own_half = !matches!(self, Cast::HealingVial(_));
        if (target.half() == caster) != wants_own_half {
            return Err(ActionError::WrongHalf {
                spell: self.spell(),
                target,
            });
        }

        if matches!(self, Cast::HealingVial(_)) && !board[target].is_elemental() {
            return Err(ActionError::NotElemental(target));
        }

        Ok(())
    }

    /// Apply the board effect of a cast that passed [`Cast::validate`].
    ///
    /// Double Turn has no board effect; the caller records the pending skip.
    /// Indexes the board directly, so an off-board target panics.
    pub(crate) fn apply(&self, board: &mut Board, caster: PlayerId) {
        let damage = self.spell().damage().unwrap_or(0);
        match *self {
            Cast::ForestStaff(target) => {
                apply_damage(&mut board[target], damage);
            }
            Cast::HealingVial(target) => {
                let cell = &mut board[target];
                cell.health = base_health(cell.level);
            }
            Cast::AncientFigurine(target) => {
                for row in half_rows(caster) {
                    apply_damage(&mut board[Coord::new(row, target.col)], damage);
                }
                for col in (0..SIZE).filter(|&col| col != target.col) {
                    apply_damage(&mut board[Coord::new(target.row, col)], damage);
                }
            }
            Cast::DoubleTurn => {}
            Cast::MeteorShower(target) => {
                let rows = half_rows(caster);
                let top = target.row.saturating_sub(1).max(rows.start);
                let bottom = (target.row + 1).min(rows.end - 1);
                let left = target.col.saturating_sub(1);
                let right = (target.col + 1).min(SIZE - 1);
                for row in top..=bottom {
                    for col in left..=right {
                        apply_damage(&mut board[Coord::new(row, col)], damage);
                    }
                }
            }
        }
    }
}

fn out_of_bounds(coord: Coord) -> ActionError {
    ActionError::OutOfBounds {
        row: i64::try_from(coord.row).unwrap_or(i64::MAX),
        col: i64::try_from(coord.col).unwrap_or(i64::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, CellType, Element, HALF_SIZE};

    fn board_filled(element: Element, level: u8) -> Board {
        let mut board = Board::new();
        for row in 0..SIZE {
            for col in 0..SIZE {
                board[Coord::new(row, col)] = Cell::elemental(element, level);
            }
        }
        board
    }

    #[test]
    fn test_spell_codes_round_trip() {
        for spell in Spell::ALL {
            assert_eq!(spell.code().parse::<Spell>(), Ok(spell));
        }
        assert_eq!(
            "xx".parse::<Spell>(),
            Err(ActionError::UnknownSpell("xx".into()))
        );
    }

    #[test]
    fn test_targeted_spell_requires_target() {
        assert_eq!(
            Cast::new(Spell::MeteorShower, None),
            Err(ActionError::MissingCoordinate("to"))
        );
        assert_eq!(Cast::new(Spell::DoubleTurn, None), Ok(Cast::DoubleTurn));
    }

    #[test]
    fn test_forest_staff_own_half_only() {
        let board = board_filled(Element::Fire, 3);
        assert!(Cast::ForestStaff(Coord::new(2, 2)).validate(&board, 0).is_ok());
        assert_eq!(
            Cast::ForestStaff(Coord::new(8, 2)).validate(&board, 0),
            Err(ActionError::WrongHalf {
                spell: Spell::ForestStaff,
                target: Coord::new(8, 2)
            })
        );
        assert!(Cast::ForestStaff(Coord::new(8, 2)).validate(&board, 1).is_ok());
    }

    #[test]
    fn test_forest_staff_damage() {
        let mut board = board_filled(Element::Fire, 3);
        Cast::ForestStaff(Coord::new(2, 2)).apply(&mut board, 0);
        assert_eq!(board[Coord::new(2, 2)].health, 4);
        assert_eq!(board[Coord::new(2, 3)].health, 6);
    }

    #[test]
    fn test_healing_vial_targets_opponent_half() {
        let mut board = board_filled(Element::Water, 3);
        board[Coord::new(9, 4)].health = 1;

        assert!(Cast::HealingVial(Coord::new(2, 4)).validate(&board, 0).is_err());
        let cast = Cast::HealingVial(Coord::new(9, 4));
        assert!(cast.validate(&board, 0).is_ok());
        cast.apply(&mut board, 0);
        assert_eq!(board[Coord::new(9, 4)].health, 6);
    }

    #[test]
    fn test_healing_vial_rejects_non_elemental() {
        let mut board = Board::new();
        board[Coord::new(7, 7)] = Cell::BLOCK;
        assert_eq!(
            Cast::HealingVial(Coord::new(7, 7)).validate(&board, 0),
            Err(ActionError::NotElemental(Coord::new(7, 7)))
        );
    }

    #[test]
    fn test_ancient_figurine_hits_column_and_full_row() {
        let mut board = board_filled(Element::Rock, 3);
        let target = Coord::new(3, 5);
        Cast::AncientFigurine(target).apply(&mut board, 0);

        for row in 0..SIZE {
            for col in 0..SIZE {
                let hit = (col == 5 && row < HALF_SIZE) || row == 3;
                let expected = if hit { 5 } else { 6 };
                assert_eq!(
                    board[Coord::new(row, col)].health,
                    expected,
                    "cell ({row}, {col})"
                );
            }
        }
    }

    #[test]
    fn test_ancient_figurine_high_half_column() {
        let mut board = board_filled(Element::Rock, 3);
        Cast::AncientFigurine(Coord::new(10, 0)).apply(&mut board, 1);
        assert_eq!(board[Coord::new(6, 0)].health, 5);
        assert_eq!(board[Coord::new(5, 0)].health, 6);
        assert_eq!(board[Coord::new(10, 11)].health, 5);
    }

    #[test]
    fn test_meteor_shower_clipped_to_half() {
        let mut board = board_filled(Element::Energy, 2);
        Cast::MeteorShower(Coord::new(5, 0)).apply(&mut board, 0);

        // 3×3 clipped: rows 4..=5, cols 0..=1. Level-2 elementals demote to level 1.
        for (row, col) in [(4, 0), (4, 1), (5, 0), (5, 1)] {
            let cell = board[Coord::new(row, col)];
            assert_eq!((cell.level, cell.health), (1, 1), "cell ({row}, {col})");
        }
        assert_eq!(board[Coord::new(6, 0)].level, 2);
        assert_eq!(board[Coord::new(5, 2)].level, 2);
    }

    #[test]
    fn test_meteor_shower_breaks_blocks() {
        let mut board = Board::new();
        board[Coord::new(7, 7)] = Cell::BLOCK;
        board[Coord::new(8, 8)] = Cell::BLOCK;
        Cast::MeteorShower(Coord::new(7, 7)).apply(&mut board, 1);
        assert_eq!(board[Coord::new(7, 7)], Cell::EMPTY);
        assert_eq!(board[Coord::new(8, 8)], Cell::EMPTY);
    }

    #[test]
    fn test_forest_staff_breaks_block() {
        let mut board = Board::new();
        board[Coord::new(2, 2)] = Cell::BLOCK;
        let cast = Cast::ForestStaff(Coord::new(2, 2));
        cast.validate(&board, 0).unwrap();
        cast.apply(&mut board, 0);
        assert_eq!(board[Coord::new(2, 2)].kind, CellType::Empty);
    }
}
