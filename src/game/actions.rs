//! Action resolution.
//!
//! Every action is validated in full before the board or pools are touched.
//! Move, attack and skip may hand the turn over; spells never do.

use crate::error::{ActionError, ActionResult};
use crate::game::{
    apply_damage, attack_damage, can_attack, has_attack_target, same_half, Cast, Coord,
    DamageOutcome, GameState, PlayerId, TurnReport, PLAYER_COUNT,
};

/// A validated-shape player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Pass the turn.
    Skip,
    /// Cast a spell.
    Cast(Cast),
    /// Swap the contents of two cells in the same half.
    Move {
        /// Source cell.
        from: Coord,
        /// Destination cell.
        to: Coord,
    },
    /// Attack an enemy elemental.
    Attack {
        /// Attacking cell.
        from: Coord,
        /// Target cell.
        to: Coord,
    },
}

/// Result of an applied action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionOutcome {
    /// What happened to the attack target, for attacks.
    pub hit: Option<DamageOutcome>,
    /// The turn advance the action triggered, if any.
    pub turn: Option<TurnReport>,
}

impl ActionOutcome {
    /// Whether the action handed the turn over (or consumed a double turn).
    #[must_use]
    pub const fn advanced(&self) -> bool {
        self.turn.is_some()
    }
}

fn on_board(coord: Coord) -> ActionResult<Coord> {
    if coord.in_bounds() {
        Ok(coord)
    } else {
        Err(ActionError::OutOfBounds {
            row: i64::try_from(coord.row).unwrap_or(i64::MAX),
            col: i64::try_from(coord.col).unwrap_or(i64::MAX),
        })
    }
}

impl GameState {
    /// Apply `action` on behalf of `player`.
    ///
    /// # Errors
    ///
    /// Returns an [`ActionError`] if the action is rejected. A rejected
    /// action leaves the state exactly as it was.
    pub fn apply(&mut self, player: PlayerId, action: &Action) -> ActionResult<ActionOutcome> {
        let result = self.resolve(player, action);
        match &result {
            Ok(outcome) => {
                tracing::trace!(
                    player,
                    turn = self.turn,
                    ?action,
                    advanced = outcome.advanced(),
                    "action applied"
                );
            }
            Err(err) => {
                tracing::debug!(player, turn = self.turn, ?action, %err, "action rejected");
            }
        }
        result
    }

    fn resolve(&mut self, player: PlayerId, action: &Action) -> ActionResult<ActionOutcome> {
        if usize::from(player) >= PLAYER_COUNT {
            return Err(ActionError::UnknownPlayer(player));
        }
        if player != self.active_player {
            return Err(ActionError::NotYourTurn {
                player,
                active: self.active_player,
            });
        }

        match *action {
            Action::Skip => Ok(ActionOutcome {
                hit: None,
                turn: Some(self.advance_turn()),
            }),
            Action::Move { from, to } => self.resolve_move(on_board(from)?, on_board(to)?),
            Action::Attack { from, to } => self.resolve_attack(on_board(from)?, on_board(to)?),
            Action::Cast(cast) => self.resolve_cast(player, cast),
        }
    }

    fn resolve_move(&mut self, from: Coord, to: Coord) -> ActionResult<ActionOutcome> {
        if !same_half(from.row, to.row) {
            return Err(ActionError::CrossesBorder { from, to });
        }

        self.board.swap(from, to);

        // A unit that lands in range may follow up with an attack.
        let turn = if has_attack_target(&self.board, to) {
            None
        } else {
            Some(self.advance_turn())
        };
        Ok(ActionOutcome { hit: None, turn })
    }

    fn resolve_attack(&mut self, from: Coord, to: Coord) -> ActionResult<ActionOutcome> {
        if !can_attack(&self.board, from, to) {
            return Err(ActionError::IllegalAttack { from, to });
        }

        let damage = attack_damage(self.board[from].level);
        let hit = apply_damage(&mut self.board[to], damage);
        Ok(ActionOutcome {
            hit: Some(hit),
            turn: Some(self.advance_turn()),
        })
    }

    fn resolve_cast(&mut self, player: PlayerId, cast: Cast) -> ActionResult<ActionOutcome> {
        cast.validate(&self.board, player)?;

        let spell = cast.spell();
        let pool = &mut self.pools[usize::from(player)];
        if self.rules.require_charge && pool.charge(spell) == 0 {
            return Err(ActionError::NoCharge(spell));
        }

        let spent = pool.spend(spell);
        cast.apply(&mut self.board, player);
        if cast == Cast::DoubleTurn {
            self.pending_skip = 1;
        }

        tracing::debug!(player, %spell, spent, target = ?cast.target(), "spell cast");
        Ok(ActionOutcome::default())
    }
}
