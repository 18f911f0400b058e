//! Initial game generation.
//!
//! Both halves receive the same number of level-1 elementals. Each player
//! draws from one or two of the six elements, and the two players never
//! share a pool: the low half picks from the first shuffled pair, the high
//! half from the second.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::game::{half, half_rows, Board, Cell, Coord, Element, GameState, SIZE};

/// Fewest elementals placed per half.
pub const MIN_ELEMENTALS: usize = 15;

/// Most elementals placed per half.
pub const MAX_ELEMENTALS: usize = 35;

impl GameState {
    /// Generate a fresh game from a seed.
    #[must_use]
    pub fn initial(seed: u64) -> Self {
        Self::with_rng(&mut SmallRng::seed_from_u64(seed))
    }

    /// Generate a fresh game from the given random source.
    #[must_use]
    pub fn with_rng<R: Rng>(rng: &mut R) -> Self {
        let mut elements = Element::ALL;
        elements.shuffle(rng);
        let per_player = rng.gen_range(1..=2);
        let count = rng.gen_range(MIN_ELEMENTALS..=MAX_ELEMENTALS);

        let [mut low, mut high] = [0, 1].map(|player| {
            half_rows(player)
                .flat_map(|row| (0..SIZE).map(move |col| Coord::new(row, col)))
                .collect::<Vec<_>>()
        });
        low.shuffle(rng);
        high.shuffle(rng);

        // The i-th unit of each half is placed together.
        let mut board = Board::new();
        for (&a, &b) in low.iter().zip(&high).take(count) {
            for coord in [a, b] {
                let pick = rng.gen_range(0..per_player) + 2 * usize::from(half(coord.row));
                board[coord] = Cell::elemental(elements[pick], 1);
            }
        }

        tracing::debug!(per_player, count, "generated initial board");
        Self::new(board)
    }
}
