//! Plain-text board rendering for terminals and logs.

// format! + push_str keeps the layout code readable
#![allow(clippy::format_push_string)]

use crate::game::{CellType, Coord, GameState, Spell, HALF_SIZE, PLAYER_COUNT, SIZE};

/// Render game state as text.
///
/// Each cell is two characters: the element letter and the level for
/// elementals, `##` for blocks and `..` for empty cells. A rule separates
/// the two halves.
///
/// ```text
/// Turn 3  player 0 to act
///      0  1  2  3  4  5  6  7  8  9 10 11
///  0  ## .. f1 .. .. .. .. .. .. .. .. ##
///  ...
///     -----------------------------------
///  6  .. w2 .. .. .. .. .. .. .. .. .. ..
///  ...
/// P0  fs 4 hv 5 af 7 dt 9 ms 10  (23 elementals)
/// P1  fs 4 hv 5 af 7 dt 9 ms 10  (23 elementals)
/// ```
#[must_use]
pub fn render_text(state: &GameState) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Turn {}  player {} to act",
        state.turn, state.active_player
    ));
    if state.pending_skip > 0 {
        output.push_str("  (double turn pending)");
    }
    output.push('\n');

    output.push_str("   ");
    for col in 0..SIZE {
        output.push_str(&format!(" {col:>2}"));
    }
    output.push('\n');

    for row in 0..SIZE {
        if row == HALF_SIZE {
            output.push_str("    ");
            output.push_str(&"-".repeat(SIZE * 3 - 1));
            output.push('\n');
        }
        output.push_str(&format!("{row:>2} "));
        for col in 0..SIZE {
            output.push(' ');
            render_cell(&mut output, state, Coord::new(row, col));
        }
        output.push('\n');
    }

    for player in 0..PLAYER_COUNT {
        output.push_str(&format!("P{player} "));
        let pool = state.pools[player];
        for spell in Spell::ALL {
            output.push_str(&format!(" {} {}", spell.code(), pool.charge(spell)));
        }
        let half = u8::try_from(player).unwrap_or(0);
        output.push_str(&format!(
            "  ({} elementals)\n",
            state.board.count_elementals(half)
        ));
    }

    output
}

fn render_cell(output: &mut String, state: &GameState, coord: Coord) {
    let cell = state.board[coord];
    match (cell.kind, cell.element) {
        (CellType::Elemental, Some(element)) => {
            output.push(element.symbol());
            output.push(char::from(b'0' + cell.level.min(9)));
        }
        (CellType::Block, _) => output.push_str("##"),
        _ => output.push_str(".."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, Cell, Element};

    #[test]
    fn test_render_cells_and_layout() {
        let mut board = Board::new();
        board[Coord::new(0, 0)] = Cell::BLOCK;
        board[Coord::new(0, 2)] = Cell::elemental(Element::Fire, 1);
        board[Coord::new(7, 1)] = Cell::elemental(Element::Water, 3);
        let state = GameState::new(board);

        let text = render_text(&state);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("Turn 1  player 0 to act"));
        assert!(lines[2].starts_with(" 0  ## .. f1 .."));
        assert!(lines[8].contains("-----"));
        assert!(lines[10].starts_with(" 7  .. w3 .."));
        assert!(text.contains("P0  fs 4 hv 5 af 7 dt 9 ms 10  (1 elementals)"));
        assert!(text.contains("P1 "));
    }

    #[test]
    fn test_render_marks_pending_double_turn() {
        let mut state = GameState::new(Board::new());
        state.pending_skip = 1;
        assert!(render_text(&state).contains("double turn pending"));
    }
}
