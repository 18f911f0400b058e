//! Border collapse: on even turns four mirrored cells become blocks.
//!
//! The sequence walks the top-left quadrant row by row and mirrors each
//! position into the other three quadrants, so after [`COLLAPSE_STEPS`]
//! even turns every cell of the board is a block.

use crate::game::{Board, Cell, Coord, HALF_SIZE, SIZE};

/// Number of even turns until the whole board has collapsed.
#[allow(clippy::cast_possible_truncation)]
pub const COLLAPSE_STEPS: u32 = (HALF_SIZE * HALF_SIZE) as u32;

/// The four cells that collapse at `turn`, or `None` if nothing collapses.
#[must_use]
pub fn collapse_targets(turn: u32) -> Option<[Coord; 4]> {
    if turn == 0 || turn % 2 != 0 {
        return None;
    }
    let step = turn / 2 - 1;
    if step >= COLLAPSE_STEPS {
        return None;
    }

    let step = usize::try_from(step).ok()?;
    let r = step / HALF_SIZE;
    let c = step % HALF_SIZE;
    let far_r = SIZE - 1 - r;
    let far_c = SIZE - 1 - c;
    Some([
        Coord::new(r, c),
        Coord::new(r, far_c),
        Coord::new(far_r, c),
        Coord::new(far_r, far_c),
    ])
}

/// Run the collapse for `turn`. Returns whether any cell was converted.
pub fn collapse_border(board: &mut Board, turn: u32) -> bool {
    let Some(targets) = collapse_targets(turn) else {
        return false;
    };

    for target in targets {
        if board[target].is_elemental() {
            displace(board, target);
        }
        board[target] = Cell::BLOCK;
    }

    tracing::trace!(turn, ?targets, "border collapse");
    true
}

/// Push the elemental at `target` one step toward the centre of its half.
///
/// The column is shifted up to the nearest non-elemental cell inside the
/// same half, which absorbs the shift. With no such cell nothing moves and
/// the elemental is lost when the block lands.
fn displace(board: &mut Board, target: Coord) {
    let col = target.col;
    let at = |row| Coord::new(row, col);

    if target.row < HALF_SIZE {
        let Some(gap) = (target.row + 1..HALF_SIZE).find(|&row| !board[at(row)].is_elemental())
        else {
            return;
        };
        for row in (target.row + 1..=gap).rev() {
            board[at(row)] = board[at(row - 1)];
        }
    } else {
        let Some(gap) = (HALF_SIZE..target.row)
            .rev()
            .find(|&row| !board[at(row)].is_elemental())
        else {
            return;
        };
        for row in gap..target.row {
            board[at(row)] = board[at(row + 1)];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CellType, Element};

    #[test]
    fn test_odd_turns_do_not_collapse() {
        assert_eq!(collapse_targets(1), None);
        assert_eq!(collapse_targets(7), None);
        let mut board = Board::new();
        assert!(!collapse_border(&mut board, 3));
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_first_targets_are_corners() {
        assert_eq!(
            collapse_targets(2),
            Some([
                Coord::new(0, 0),
                Coord::new(0, 11),
                Coord::new(11, 0),
                Coord::new(11, 11)
            ])
        );
    }

    #[test]
    fn test_sequence_walks_quadrant_row_major() {
        // Step 7 (turn 16) is the second cell of the second quadrant row.
        assert_eq!(
            collapse_targets(16),
            Some([
                Coord::new(1, 1),
                Coord::new(1, 10),
                Coord::new(10, 1),
                Coord::new(10, 10)
            ])
        );
    }

    #[test]
    fn test_full_sequence_covers_board() {
        let mut board = Board::new();
        for turn in 1..=2 * COLLAPSE_STEPS {
            collapse_border(&mut board, turn);
        }
        assert!(board.cells().iter().all(|cell| cell.kind == CellType::Block));

        assert_eq!(collapse_targets(2 * COLLAPSE_STEPS + 2), None);
    }

    #[test]
    fn test_elemental_pushed_toward_centre_low_half() {
        let mut board = Board::new();
        board[Coord::new(0, 0)] = Cell::elemental(Element::Fire, 1);
        board[Coord::new(1, 0)] = Cell::elemental(Element::Water, 2);
        board[Coord::new(3, 0)] = Cell::BLOCK;

        collapse_border(&mut board, 2);

        assert_eq!(board[Coord::new(0, 0)], Cell::BLOCK);
        assert_eq!(board[Coord::new(1, 0)], Cell::elemental(Element::Fire, 1));
        assert_eq!(board[Coord::new(2, 0)], Cell::elemental(Element::Water, 2));
        assert_eq!(board[Coord::new(3, 0)], Cell::BLOCK);
    }

    #[test]
    fn test_gap_absorbs_shift_high_half() {
        let mut board = Board::new();
        board[Coord::new(11, 11)] = Cell::elemental(Element::Rock, 3);
        board[Coord::new(10, 11)] = Cell::elemental(Element::Air, 1);
        board[Coord::new(9, 11)] = Cell::BLOCK;

        collapse_border(&mut board, 2);

        assert_eq!(board[Coord::new(11, 11)], Cell::BLOCK);
        assert_eq!(board[Coord::new(10, 11)], Cell::elemental(Element::Rock, 3));
        // The block at row 9 was the nearest non-elemental and absorbed the shift.
        assert_eq!(board[Coord::new(9, 11)], Cell::elemental(Element::Air, 1));
        assert_eq!(board[Coord::new(8, 11)], Cell::EMPTY);
    }

    #[test]
    fn test_elemental_lost_when_column_full() {
        let mut board = Board::new();
        for row in 0..HALF_SIZE {
            board[Coord::new(row, 0)] = Cell::elemental(Element::Nature, 1);
        }

        collapse_border(&mut board, 2);

        assert_eq!(board[Coord::new(0, 0)], Cell::BLOCK);
        assert_eq!(board.count_elementals(0), 5);
        // Nothing leaked into the other half.
        assert_eq!(board[Coord::new(6, 0)], Cell::EMPTY);
    }

    #[test]
    fn test_elemental_lost_when_column_full_high_half() {
        let mut board = Board::new();
        for row in HALF_SIZE..SIZE {
            board[Coord::new(row, 11)] = Cell::elemental(Element::Fire, 2);
        }

        collapse_border(&mut board, 2);

        assert_eq!(board[Coord::new(11, 11)], Cell::BLOCK);
        assert_eq!(board.count_elementals(1), 5);
        for row in HALF_SIZE..SIZE - 1 {
            assert_eq!(board[Coord::new(row, 11)], Cell::elemental(Element::Fire, 2));
        }
        // The low half only gained its two corner blocks.
        assert_eq!(board.count_elementals(0), 0);
        assert_eq!(board[Coord::new(5, 11)], Cell::EMPTY);
        assert_eq!(board[Coord::new(0, 11)], Cell::BLOCK);
    }
}
