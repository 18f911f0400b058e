//! Triple-match ascension.
//!
//! Three matching elementals in a line (same element, same level 1 or 2)
//! collapse into one: the ends are removed and the middle ascends a level.
//! One half of the board is scanned per call.
//!
//! ```text
//! rows      columns     diagonals
//! # # #     # . .       # . .     . . #
//! . . .     # . .       . # .     . # .
//! . . .     # . .       . . #     # . .
//! ```

use crate::game::{Board, Cell, Coord, PlayerId, HALF_SIZE, MAX_LEVEL, SIZE};

/// Triple patterns as `(row, col)` offsets from the anchor; the middle entry ascends.
const PATTERNS: [[(i8, i8); 3]; 8] = [
    [(-1, -1), (-1, 0), (-1, 1)],
    [(0, -1), (0, 0), (0, 1)],
    [(1, -1), (1, 0), (1, 1)],
    [(-1, -1), (0, -1), (1, -1)],
    [(-1, 0), (0, 0), (1, 0)],
    [(-1, 1), (0, 1), (1, 1)],
    [(-1, -1), (0, 0), (1, 1)],
    [(-1, 1), (0, 0), (1, -1)],
];

/// Pending change for one cell. Later variants take precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
enum MergeFlag {
    #[default]
    None,
    Remove,
    Ascend,
}

/// Summary of one merge pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeOutcome {
    /// Charge yield: sum of the pre-ascension levels of ascended cells.
    pub charge_yield: u32,
    /// Number of cells that ascended.
    pub ascended: u32,
    /// Number of cells that were removed.
    pub removed: u32,
}

fn shift(base: usize, delta: i8) -> usize {
    base.wrapping_add_signed(isize::from(delta))
}

fn is_triple(board: &Board, cells: [Coord; 3]) -> bool {
    let [a, b, c] = cells.map(|coord| board[coord]);
    a.is_elemental() && a.level > 0 && a.level < MAX_LEVEL && a.same_kind(&b) && a.same_kind(&c)
}

/// Run one merge pass over `half` and return what it produced.
///
/// Only interior anchors of the half are scanned (its outer ring is
/// excluded), so every addressed cell stays inside the half.
pub fn merge_half(board: &mut Board, half: PlayerId) -> MergeOutcome {
    let offset = usize::from(half.min(1)) * HALF_SIZE;
    let mut flags = [[MergeFlag::None; SIZE]; HALF_SIZE];

    for row in 1..HALF_SIZE - 1 {
        for col in 1..SIZE - 1 {
            for pattern in &PATTERNS {
                let local = pattern.map(|(dr, dc)| (shift(row, dr), shift(col, dc)));
                let cells = local.map(|(r, c)| Coord::new(r + offset, c));
                if !is_triple(board, cells) {
                    continue;
                }

                for (i, (r, c)) in local.into_iter().enumerate() {
                    let flag = if i == 1 {
                        MergeFlag::Ascend
                    } else {
                        MergeFlag::Remove
                    };
                    flags[r][c] = flags[r][c].max(flag);
                }
            }
        }
    }

    let mut outcome = MergeOutcome::default();
    for (row, row_flags) in flags.iter().enumerate() {
        for (col, flag) in row_flags.iter().enumerate() {
            let cell = &mut board[Coord::new(row + offset, col)];
            match flag {
                MergeFlag::None => {}
                MergeFlag::Remove => {
                    *cell = Cell::EMPTY;
                    outcome.removed += 1;
                }
                MergeFlag::Ascend => {
                    outcome.charge_yield += u32::from(cell.level);
                    outcome.ascended += 1;
                    cell.ascend();
                }
            }
        }
    }

    if outcome.ascended > 0 {
        tracing::trace!(
            half,
            ascended = outcome.ascended,
            removed = outcome.removed,
            charge_yield = outcome.charge_yield,
            "merge pass"
        );
    }

    outcome
}
