//! Board, cell and geometry types.
//!
//! The board is a fixed 12×12 grid stored in row-major order. Rows `0..6`
//! form the low half (player 0), rows `6..12` the high half (player 1).

use std::ops::{Index, IndexMut, Range};

use serde::{Deserialize, Serialize};

use crate::game::PlayerId;

/// Side length of the square board.
pub const SIZE: usize = 12;

/// Number of rows in one player's half.
pub const HALF_SIZE: usize = SIZE / 2;

/// Highest level an elemental can reach.
pub const MAX_LEVEL: u8 = 3;

/// Check whether a signed `(row, col)` pair lies on the board.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub const fn valid(row: i64, col: i64) -> bool {
    row >= 0 && row < SIZE as i64 && col >= 0 && col < SIZE as i64
}

/// The half (and therefore owning player) a row belongs to.
#[must_use]
pub const fn half(row: usize) -> PlayerId {
    if row < HALF_SIZE { 0 } else { 1 }
}

/// Check whether two rows belong to the same half.
#[must_use]
pub const fn same_half(r1: usize, r2: usize) -> bool {
    half(r1) == half(r2)
}

/// Rows owned by the given half.
#[must_use]
pub const fn half_rows(half: PlayerId) -> Range<usize> {
    if half == 0 {
        0..HALF_SIZE
    } else {
        HALF_SIZE..SIZE
    }
}

/// Base (full) health of an elemental at `level`.
#[must_use]
pub const fn base_health(level: u8) -> u8 {
    match level {
        1 => 1,
        2 => 2,
        3 => 6,
        _ => 0,
    }
}

/// Damage dealt by an attack from an elemental at `level`.
#[must_use]
pub const fn attack_damage(level: u8) -> u8 {
    match level {
        1 => 1,
        2 => 2,
        3 => 4,
        _ => 0,
    }
}

/// Maximum row distance an elemental at `level` can attack across.
#[must_use]
pub const fn attack_reach(level: u8) -> u8 {
    match level {
        1 => 3,
        2 => 5,
        3 => 7,
        _ => 0,
    }
}

/// A coordinate on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Row (0 is player 0's back edge).
    pub row: usize,
    /// Column.
    pub col: usize,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Create a coordinate from signed input, returning `None` when off the board.
    #[must_use]
    pub fn checked(row: i64, col: i64) -> Option<Self> {
        if !valid(row, col) {
            return None;
        }
        Some(Self::new(usize::try_from(row).ok()?, usize::try_from(col).ok()?))
    }

    /// Check if this coordinate lies on the board.
    #[must_use]
    pub const fn in_bounds(self) -> bool {
        self.row < SIZE && self.col < SIZE
    }

    /// The half this coordinate belongs to.
    #[must_use]
    pub const fn half(self) -> PlayerId {
        half(self.row)
    }

    const fn index(self) -> usize {
        self.row * SIZE + self.col
    }
}

/// What occupies a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    /// Nothing; units may move here.
    #[default]
    Empty,
    /// Impassable obstacle left by border collapse.
    Block,
    /// A combat unit.
    Elemental,
}

/// Elemental kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    /// Air.
    Air,
    /// Rock.
    Rock,
    /// Fire.
    Fire,
    /// Water.
    Water,
    /// Nature.
    Nature,
    /// Energy.
    Energy,
}

impl Element {
    /// All elements in canonical order.
    pub const ALL: [Element; 6] = [
        Element::Air,
        Element::Rock,
        Element::Fire,
        Element::Water,
        Element::Nature,
        Element::Energy,
    ];

    /// Single-letter symbol used by the text renderer.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Element::Air => 'a',
            Element::Rock => 'r',
            Element::Fire => 'f',
            Element::Water => 'w',
            Element::Nature => 'n',
            Element::Energy => 'e',
        }
    }
}

/// A single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    /// What occupies the cell.
    pub kind: CellType,
    /// Element of the occupant (elementals only).
    pub element: Option<Element>,
    /// Remaining health (elementals only).
    pub health: u8,
    /// Level 1..=3 (elementals only).
    pub level: u8,
}

impl Cell {
    /// An empty cell.
    pub const EMPTY: Cell = Cell {
        kind: CellType::Empty,
        element: None,
        health: 0,
        level: 0,
    };

    /// A block cell.
    pub const BLOCK: Cell = Cell {
        kind: CellType::Block,
        element: None,
        health: 0,
        level: 0,
    };

    /// An elemental at full health for its level.
    #[must_use]
    pub const fn elemental(element: Element, level: u8) -> Self {
        Self {
            kind: CellType::Elemental,
            element: Some(element),
            health: base_health(level),
            level,
        }
    }

    /// Check whether the cell holds an elemental.
    #[must_use]
    pub const fn is_elemental(&self) -> bool {
        matches!(self.kind, CellType::Elemental)
    }

    /// Check whether two cells hold the same kind of unit (type, element and level).
    #[must_use]
    pub fn same_kind(&self, other: &Cell) -> bool {
        self.kind == other.kind && self.element == other.element && self.level == other.level
    }

    /// Promote to the next level at full health.
    pub fn ascend(&mut self) {
        self.level = (self.level + 1).min(MAX_LEVEL);
        self.health = base_health(self.level);
    }
}

/// The game board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Cells stored in row-major order.
    cells: Vec<Cell>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a board with every cell empty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: vec![Cell::EMPTY; SIZE * SIZE],
        }
    }

    /// Raw cells in row-major order.
    #[must_use]
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Get a reference to the cell at the given coordinate.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        coord.in_bounds().then(|| &self.cells[coord.index()])
    }

    /// Get a mutable reference to the cell at the given coordinate.
    #[must_use]
    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        if coord.in_bounds() {
            Some(&mut self.cells[coord.index()])
        } else {
            None
        }
    }

    /// Set the cell at the given coordinate.
    ///
    /// Returns `false` if the coordinate is out of bounds.
    pub fn set(&mut self, coord: Coord, cell: Cell) -> bool {
        if let Some(slot) = self.get_mut(coord) {
            *slot = cell;
            true
        } else {
            false
        }
    }

    /// Exchange the contents of two cells.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is off the board.
    pub fn swap(&mut self, a: Coord, b: Coord) {
        self.cells.swap(a.index(), b.index());
    }

    /// Iterate over all coordinates and cells.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| (Coord::new(idx / SIZE, idx % SIZE), cell))
    }

    /// Count elementals standing in the given half.
    #[must_use]
    pub fn count_elementals(&self, half: PlayerId) -> u32 {
        let rows = half_rows(half);
        let count = self.cells[rows.start * SIZE..rows.end * SIZE]
            .iter()
            .filter(|cell| cell.is_elemental())
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

impl Index<Coord> for Board {
    type Output = Cell;

    fn index(&self, coord: Coord) -> &Cell {
        &self.cells[coord.index()]
    }
}

impl IndexMut<Coord> for Board {
    fn index_mut(&mut self, coord: Coord) -> &mut Cell {
        &mut self.cells[coord.index()]
    }
}
