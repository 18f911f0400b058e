//! Random self-play.
//!
//! Games are driven by a random agent that prefers legal attacks and moves
//! but still submits the occasional ill-formed or illegal action, so long
//! runs exercise rejection paths as well as every rule.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::game::{
    assert_invariants, can_attack, half_rows, opponent, Action, Cast, Coord, GameState, PlayerId,
    RuleConfig, Spell, PLAYER_COUNT, SIZE,
};

/// Simulation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Actions submitted per game, accepted or not.
    pub max_actions: u32,
    /// Stop as soon as one half has no elementals left.
    pub stop_on_winner: bool,
    /// Rule switches for every game.
    pub rules: RuleConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_actions: 500,
            stop_on_winner: true,
            rules: RuleConfig::default(),
        }
    }
}

/// Summary of one simulated game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Seed of the game.
    pub seed: u64,
    /// Turn reached.
    pub turns: u32,
    /// Actions applied.
    pub accepted: u32,
    /// Actions rejected.
    pub rejected: u32,
    /// Charge produced by merges.
    pub charge_yield: u32,
    /// Border collapse passes that ran.
    pub collapses: u32,
    /// Elementals left in each half.
    pub survivors: [u32; PLAYER_COUNT],
    /// Seat whose opponent was wiped out, if any.
    pub winner: Option<PlayerId>,
}

/// Aggregated results over many games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SimulationStats {
    /// Games played.
    pub games_played: u64,
    /// Wins per seat.
    pub wins: [u64; PLAYER_COUNT],
    /// Games without a winner.
    pub undecided: u64,
    /// Total turns reached.
    pub total_turns: u64,
    /// Total actions applied.
    pub accepted: u64,
    /// Total actions rejected.
    pub rejected: u64,
    /// Total charge produced by merges.
    pub charge_yield: u64,
}

impl SimulationStats {
    /// Fold one game into the totals.
    pub fn add_result(&mut self, result: &SimulationResult) {
        self.games_played += 1;
        match result.winner {
            Some(seat) => self.wins[usize::from(seat)] += 1,
            None => self.undecided += 1,
        }
        self.total_turns += u64::from(result.turns);
        self.accepted += u64::from(result.accepted);
        self.rejected += u64::from(result.rejected);
        self.charge_yield += u64::from(result.charge_yield);
    }

    /// Merge totals from another accumulator.
    pub fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        for (wins, other) in self.wins.iter_mut().zip(other.wins) {
            *wins += other;
        }
        self.undecided += other.undecided;
        self.total_turns += other.total_turns;
        self.accepted += other.accepted;
        self.rejected += other.rejected;
        self.charge_yield += other.charge_yield;
    }

    /// Mean turn reached per game.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_turns(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.games_played as f64
    }
}

fn cells_in(rows: std::ops::Range<usize>) -> impl Iterator<Item = Coord> {
    rows.flat_map(|row| (0..SIZE).map(move |col| Coord::new(row, col)))
}

fn random_cell<R: Rng>(player: PlayerId, rng: &mut R) -> Coord {
    let rows = half_rows(player);
    Coord::new(rng.gen_range(rows), rng.gen_range(0..SIZE))
}

/// Pick an action for the active player.
#[must_use]
pub fn random_action<R: Rng>(state: &GameState, rng: &mut R) -> Action {
    let me = state.active_player;
    let roll = rng.gen_range(0..100);

    if roll < 5 {
        return Action::Skip;
    }

    if roll < 20 {
        let spell = *Spell::ALL.choose(rng).unwrap_or(&Spell::DoubleTurn);
        let target = match spell {
            Spell::HealingVial => random_cell(opponent(me), rng),
            _ => random_cell(me, rng),
        };
        return Action::Cast(Cast::new(spell, Some(target)).unwrap_or(Cast::DoubleTurn));
    }

    let own: Vec<Coord> = cells_in(half_rows(me))
        .filter(|&coord| state.board[coord].is_elemental())
        .collect();

    if roll < 60 {
        let attacks: Vec<(Coord, Coord)> = own
            .iter()
            .flat_map(|&from| {
                cells_in(half_rows(opponent(me)))
                    .filter(move |&to| can_attack(&state.board, from, to))
                    .map(move |to| (from, to))
            })
            .collect();
        if let Some(&(from, to)) = attacks.choose(rng) {
            return Action::Attack { from, to };
        }
    }

    let Some(&from) = own.choose(rng) else {
        return Action::Skip;
    };
    // Now and then aim anywhere on the board, crossing the border.
    let to = if rng.gen_range(0..10) == 0 {
        Coord::new(rng.gen_range(0..SIZE), rng.gen_range(0..SIZE))
    } else {
        random_cell(me, rng)
    };
    Action::Move { from, to }
}

/// Play one random game.
#[must_use]
pub fn run_game(seed: u64, config: &SimulationConfig) -> SimulationResult {
    let mut state = GameState::initial(seed).with_rules(config.rules);
    let mut rng = SmallRng::seed_from_u64(seed.rotate_left(17) ^ 0x9e37_79b9_7f4a_7c15);
    let mut result = SimulationResult {
        seed,
        ..SimulationResult::default()
    };

    for _ in 0..config.max_actions {
        if config.stop_on_winner && state.winner().is_some() {
            break;
        }

        let player = state.active_player;
        let action = random_action(&state, &mut rng);

        match state.apply(player, &action) {
            Ok(outcome) => {
                result.accepted += 1;
                if let Some(report) = outcome.turn {
                    result.charge_yield += report.merge.charge_yield;
                    result.collapses += u32::from(report.collapsed);
                }
            }
            Err(_) => result.rejected += 1,
        }
        assert_invariants(&state);
    }

    result.turns = state.turn;
    result.survivors = [state.board.count_elementals(0), state.board.count_elementals(1)];
    result.winner = state.winner();
    tracing::debug!(?result, "simulation finished");
    result
}
