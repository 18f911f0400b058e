//! Property-based tests for the rules engine.
//!
//! Run with: cargo test --release prop_game

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use elementa::game::{
    apply_damage, base_health, check_invariants, half_rows, merge_half, opponent, Action, Board,
    Cast, Cell, CellType, Coord, DamageOutcome, Element, GameState, Spell, MAX_LEVEL, SIZE,
};
use elementa::simulate::random_action;
use elementa::{GameSnapshot, GameSoa};

fn arb_cell() -> impl Strategy<Value = Cell> {
    prop_oneof![
        3 => Just(Cell::EMPTY),
        1 => Just(Cell::BLOCK),
        6 => (0usize..Element::ALL.len(), 1u8..=MAX_LEVEL).prop_flat_map(|(e, level)| {
            (1u8..=base_health(level)).prop_map(move |health| Cell {
                health,
                ..Cell::elemental(Element::ALL[e], level)
            })
        }),
    ]
}

/// Cells drawn from two elements and levels 1..=2 so triples show up often.
fn arb_mergeable_cell() -> impl Strategy<Value = Cell> {
    prop_oneof![
        1 => Just(Cell::EMPTY),
        4 => (0usize..2, 1u8..=2).prop_map(|(e, level)| Cell::elemental(Element::ALL[e], level)),
    ]
}

fn board_from(cells: &[Cell]) -> Board {
    let mut board = Board::new();
    for (i, cell) in cells.iter().enumerate() {
        board.set(Coord::new(i / SIZE, i % SIZE), *cell);
    }
    board
}

fn half_cells(board: &Board, half: u8) -> Vec<(Coord, Cell)> {
    half_rows(half)
        .flat_map(|row| (0..SIZE).map(move |col| Coord::new(row, col)))
        .map(|coord| (coord, board[coord]))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Converting to the array-of-arrays form and back is exact.
    #[test]
    fn prop_soa_round_trip(cells in prop::collection::vec(arb_cell(), SIZE * SIZE), turn in 1u32..200, active in 0u8..2) {
        let mut state = GameState::new(board_from(&cells));
        state.turn = turn;
        state.active_player = active;

        let soa = GameSoa::from(&state);
        let snapshot = GameSnapshot::from(&soa);
        let again = GameSoa::from(&snapshot);
        prop_assert_eq!(&soa, &again);
        prop_assert_eq!(GameState::from(&again), state);
    }

    /// The JSON form of a snapshot parses back to the same snapshot.
    #[test]
    fn prop_soa_json_round_trip(seed: u64) {
        let soa = GameSoa::from(&GameState::initial(seed));
        let json = serde_json::to_string(&soa).unwrap();
        let parsed: GameSoa = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(parsed, soa);
    }

    /// Damage never raises health or level and lands in exactly one of the documented outcomes.
    #[test]
    fn prop_damage_monotone(level in 1u8..=MAX_LEVEL, health_seed in 1u8..=8, damage in 0u8..12) {
        let health = health_seed.min(base_health(level));
        let before = Cell { health, ..Cell::elemental(Element::Water, level) };
        let mut cell = before;

        match apply_damage(&mut cell, damage) {
            DamageOutcome::Wounded => {
                prop_assert_eq!(cell.level, level);
                prop_assert_eq!(cell.health, health - damage);
                prop_assert!(cell.health > 0);
            }
            DamageOutcome::Demoted => {
                prop_assert!(level > 1);
                prop_assert!(damage >= health);
                prop_assert_eq!(cell.level, level - 1);
                prop_assert_eq!(cell.health, base_health(level - 1));
            }
            DamageOutcome::Destroyed => {
                prop_assert_eq!(level, 1);
                prop_assert!(damage >= health);
                prop_assert_eq!(cell, Cell::EMPTY);
            }
            DamageOutcome::Unaffected | DamageOutcome::Cleared => {
                prop_assert!(false, "elemental was treated as terrain");
            }
        }
        prop_assert!(cell.level <= before.level);
        prop_assert!(cell.level < before.level || cell.health <= before.health);
    }

    /// Any hit breaks a block, and an empty cell stays empty.
    #[test]
    fn prop_damage_empties_non_elementals(damage: u8, block: bool) {
        let mut cell = if block { Cell::BLOCK } else { Cell::EMPTY };
        let expected = if block { DamageOutcome::Cleared } else { DamageOutcome::Unaffected };
        prop_assert_eq!(apply_damage(&mut cell, damage), expected);
        prop_assert_eq!(cell.kind, CellType::Empty);
        prop_assert_eq!(cell, Cell::EMPTY);
    }

    /// A merge pass touches only its own half and every removal empties an elemental.
    #[test]
    fn prop_merge_conserves(cells in prop::collection::vec(arb_mergeable_cell(), SIZE * SIZE), half in 0u8..2) {
        let mut board = board_from(&cells);
        let before = board.clone();
        let elementals_before = board.count_elementals(half);

        let outcome = merge_half(&mut board, half);

        prop_assert_eq!(half_cells(&board, opponent(half)), half_cells(&before, opponent(half)));
        prop_assert_eq!(board.count_elementals(half), elementals_before - outcome.removed);
        // Each ascended cell was level 1 or 2 before the pass.
        prop_assert!(outcome.charge_yield >= outcome.ascended);
        prop_assert!(outcome.charge_yield <= 2 * outcome.ascended);
        if outcome.ascended > 0 {
            prop_assert!(outcome.removed > 0);
        }
        // Every unit started at full health and ascension refills it.
        for (_, cell) in board.iter().filter(|(_, cell)| cell.is_elemental()) {
            prop_assert!(cell.level <= MAX_LEVEL);
            prop_assert_eq!(cell.health, base_health(cell.level));
        }
    }

    /// Every non-suppressed advance bumps the turn by one and flips the player.
    #[test]
    fn prop_turn_parity(seed: u64, advances in 1usize..80) {
        let mut state = GameState::initial(seed);
        for i in 0..advances {
            let turn = state.turn;
            let report = state.advance_turn();
            prop_assert_eq!(report.merged_half, u8::from(turn % 2 == 1));
            prop_assert!(!report.suppressed);
            prop_assert!(!report.collapsed || turn % 2 == 0);
            prop_assert_eq!(state.turn, turn + 1);
            prop_assert_eq!(usize::from(state.active_player), (i + 1) % 2);
        }
    }

    /// Double Turn holds the seat for exactly one advance.
    #[test]
    fn prop_double_turn_suppresses_once(seed: u64, skips_first in 0usize..6) {
        let mut state = GameState::initial(seed);
        for _ in 0..skips_first {
            let player = state.active_player;
            state.apply(player, &Action::Skip).unwrap();
        }
        let player = state.active_player;
        let turn = state.turn;

        let cast = Cast::new(Spell::DoubleTurn, None).unwrap();
        let outcome = state.apply(player, &Action::Cast(cast)).unwrap();
        prop_assert!(!outcome.advanced());

        let held = state.apply(player, &Action::Skip).unwrap();
        prop_assert!(held.turn.is_some_and(|report| report.suppressed));
        prop_assert_eq!(state.active_player, player);
        prop_assert_eq!(state.turn, turn);

        state.apply(player, &Action::Skip).unwrap();
        prop_assert_eq!(state.active_player, opponent(player));
        prop_assert_eq!(state.turn, turn + 1);
    }

    /// Random play never breaks the state invariants, and rejections leave the state untouched.
    #[test]
    fn prop_random_play_keeps_invariants(seed: u64, actions in 1usize..300) {
        let mut state = GameState::initial(seed);
        let mut rng = SmallRng::seed_from_u64(seed);

        for _ in 0..actions {
            let action = random_action(&state, &mut rng);
            let before = state.clone();
            if state.apply(state.active_player, &action).is_err() {
                prop_assert_eq!(&state, &before);
            }
            let violations = check_invariants(&state);
            prop_assert!(violations.is_empty(), "{:?}", violations);
        }
    }
}
