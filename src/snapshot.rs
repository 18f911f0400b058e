//! Board snapshots in array-of-structs and structure-of-arrays form.
//!
//! Clients receive the compact [`GameSoa`]: four parallel 12×12 grids plus
//! pools, active player and turn. [`GameSnapshot`] is the per-cell form.
//! Conversions in every direction are exact.

use serde::de::IntoDeserializer;
use serde::de::value::StrDeserializer;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::game::{
    Board, Cell, CellType, Coord, Element, GameState, PlayerId, ResourcePool, Spell,
    PLAYER_COUNT, SIZE,
};

/// Element as it appears on the wire; no element is the empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ElementTag(pub Option<Element>);

impl From<Option<Element>> for ElementTag {
    fn from(element: Option<Element>) -> Self {
        Self(element)
    }
}

impl Serialize for ElementTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(element) => element.serialize(serializer),
            None => serializer.serialize_str(""),
        }
    }
}

impl<'de> Deserialize<'de> for ElementTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        if tag.is_empty() {
            return Ok(Self(None));
        }
        let inner: StrDeserializer<'_, D::Error> = tag.as_str().into_deserializer();
        Element::deserialize(inner).map(|element| Self(Some(element)))
    }
}

/// One cell in array-of-structs form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellSnapshot {
    /// Occupant kind.
    #[serde(rename = "type")]
    pub kind: CellType,
    /// Occupant element.
    pub element: ElementTag,
    /// Remaining health.
    pub health: u8,
    /// Level.
    pub level: u8,
}

impl From<Cell> for CellSnapshot {
    fn from(cell: Cell) -> Self {
        Self {
            kind: cell.kind,
            element: cell.element.into(),
            health: cell.health,
            level: cell.level,
        }
    }
}

impl From<CellSnapshot> for Cell {
    fn from(cell: CellSnapshot) -> Self {
        Self {
            kind: cell.kind,
            element: cell.element.0,
            health: cell.health,
            level: cell.level,
        }
    }
}

/// A grid of per-cell values.
pub type Grid<T> = [[T; SIZE]; SIZE];

/// Board as four parallel grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoardSoa {
    /// Occupant kinds.
    #[serde(rename = "type")]
    pub kind: Grid<CellType>,
    /// Occupant elements.
    pub element: Grid<ElementTag>,
    /// Remaining health.
    pub health: Grid<u8>,
    /// Levels.
    pub level: Grid<u8>,
}

impl BoardSoa {
    /// The cell at `coord` in array-of-structs form.
    #[must_use]
    pub const fn cell(&self, coord: Coord) -> CellSnapshot {
        let Coord { row, col } = coord;
        CellSnapshot {
            kind: self.kind[row][col],
            element: self.element[row][col],
            health: self.health[row][col],
            level: self.level[row][col],
        }
    }

    fn set(&mut self, coord: Coord, cell: CellSnapshot) {
        let Coord { row, col } = coord;
        self.kind[row][col] = cell.kind;
        self.element[row][col] = cell.element;
        self.health[row][col] = cell.health;
        self.level[row][col] = cell.level;
    }
}

impl From<&Board> for BoardSoa {
    fn from(board: &Board) -> Self {
        let mut soa = Self::default();
        for (coord, &cell) in board.iter() {
            soa.set(coord, cell.into());
        }
        soa
    }
}

impl From<&BoardSoa> for Board {
    fn from(soa: &BoardSoa) -> Self {
        let mut board = Board::new();
        for row in 0..SIZE {
            for col in 0..SIZE {
                let coord = Coord::new(row, col);
                board[coord] = soa.cell(coord).into();
            }
        }
        board
    }
}

/// Game state as sent to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameSoa {
    /// The board.
    pub board_soa: BoardSoa,
    /// Charge counters per player, in spell order.
    pub players: [[u8; Spell::COUNT]; PLAYER_COUNT],
    /// Player whose turn it is.
    pub active_player: PlayerId,
    /// Current turn.
    pub turn: u32,
    /// Turn hand-overs still to be suppressed by a double turn.
    #[serde(default)]
    pub pending_skip: u8,
}

impl From<&GameState> for GameSoa {
    fn from(state: &GameState) -> Self {
        Self {
            board_soa: BoardSoa::from(&state.board),
            players: state.pools.map(|pool| pool.charges()),
            active_player: state.active_player,
            turn: state.turn,
            pending_skip: state.pending_skip,
        }
    }
}

impl From<&GameSoa> for GameState {
    /// Rebuild a session from a snapshot. Rule switches take their defaults.
    fn from(soa: &GameSoa) -> Self {
        let mut state = GameState::new(Board::from(&soa.board_soa));
        state.pools = soa.players.map(ResourcePool::from_charges);
        state.active_player = soa.active_player;
        state.turn = soa.turn;
        state.pending_skip = soa.pending_skip;
        state
    }
}

/// Game state in array-of-structs form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// The board, one struct per cell.
    pub board: Grid<CellSnapshot>,
    /// Charge counters per player, in spell order.
    pub players: [[u8; Spell::COUNT]; PLAYER_COUNT],
    /// Player whose turn it is.
    pub active_player: PlayerId,
    /// Current turn.
    pub turn: u32,
    /// Turn hand-overs still to be suppressed by a double turn.
    #[serde(default)]
    pub pending_skip: u8,
}

impl From<&GameSoa> for GameSnapshot {
    fn from(soa: &GameSoa) -> Self {
        let mut board = [[CellSnapshot::default(); SIZE]; SIZE];
        for (row, cells) in board.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                *cell = soa.board_soa.cell(Coord::new(row, col));
            }
        }
        Self {
            board,
            players: soa.players,
            active_player: soa.active_player,
            turn: soa.turn,
            pending_skip: soa.pending_skip,
        }
    }
}

impl From<&GameSnapshot> for GameSoa {
    fn from(aos: &GameSnapshot) -> Self {
        let mut board_soa = BoardSoa::default();
        for (row, cells) in aos.board.iter().enumerate() {
            for (col, &cell) in cells.iter().enumerate() {
                board_soa.set(Coord::new(row, col), cell);
            }
        }
        Self {
            board_soa,
            players: aos.players,
            active_player: aos.active_player,
            turn: aos.turn,
            pending_skip: aos.pending_skip,
        }
    }
}
