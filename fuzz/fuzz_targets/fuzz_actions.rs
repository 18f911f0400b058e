#![no_main]

//! Action sequence fuzzer.
//!
//! Feeds arbitrary typed actions, including off-board coordinates and
//! out-of-turn players, into a seeded game and checks after every step
//! that rejected actions change nothing and the state stays consistent.

use arbitrary::Arbitrary;
use elementa::game::{check_invariants, Action, Cast, Coord, GameState, RuleConfig, Spell};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated action.
#[derive(Arbitrary, Debug, Clone)]
enum FuzzAction {
    Skip,
    Cast { spell: u8, row: u8, col: u8 },
    Move { from: (u8, u8), to: (u8, u8) },
    Attack { from: (u8, u8), to: (u8, u8) },
}

/// Structured input for action fuzzing.
#[derive(Arbitrary, Debug)]
struct ActionInput {
    seed: u64,
    require_charge: bool,
    steps: Vec<(u8, FuzzAction)>,
}

/// Coordinates mostly land on the board, sometimes just past it.
fn coord((row, col): (u8, u8)) -> Coord {
    Coord::new(usize::from(row % 14), usize::from(col % 14))
}

fn to_action(action: &FuzzAction) -> Option<Action> {
    Some(match *action {
        FuzzAction::Skip => Action::Skip,
        FuzzAction::Cast { spell, row, col } => {
            let spell = Spell::ALL[usize::from(spell) % Spell::COUNT];
            Action::Cast(Cast::new(spell, Some(coord((row, col)))).ok()?)
        }
        FuzzAction::Move { from, to } => Action::Move {
            from: coord(from),
            to: coord(to),
        },
        FuzzAction::Attack { from, to } => Action::Attack {
            from: coord(from),
            to: coord(to),
        },
    })
}

fuzz_target!(|input: ActionInput| {
    let mut state = GameState::initial(input.seed).with_rules(RuleConfig {
        require_charge: input.require_charge,
    });

    for (step, (player, action)) in input.steps.iter().take(200).enumerate() {
        let Some(action) = to_action(action) else {
            continue;
        };
        let turn = state.turn;
        let before = state.clone();

        match state.apply(player % 3, &action) {
            Ok(outcome) => {
                assert!(state.turn == turn || state.turn == turn + 1);
                assert_eq!(outcome.advanced() && !outcome.turn.is_some_and(|t| t.suppressed), state.turn == turn + 1);
            }
            Err(_) => assert_eq!(state, before, "rejected step {step} mutated state"),
        }

        let violations = check_invariants(&state);
        assert!(
            violations.is_empty(),
            "Invariants violated after step {step}: {violations:?}"
        );
    }
});
