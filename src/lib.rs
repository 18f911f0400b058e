// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Elementa: a server-authoritative rules engine for a two-player elemental
//! territory battle on a 12×12 board.
//!
//! Clients submit discrete actions (skip, cast, move, attack). The engine
//! validates each one against the full game state, applies it atomically
//! and returns the resulting snapshot.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI / Lobby store / Scripts       │
//! ├─────────────────────────────────────┤
//! │   Wire: requests, snapshots         │
//! ├─────────────────────────────────────┤
//! │   Rules: actions, turn controller   │
//! ├─────────────────────────────────────┤
//! │   Board, merge, collapse, combat    │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use elementa::{Action, GameState};
//!
//! let mut game = GameState::initial(42);
//! let outcome = game.apply(0, &Action::Skip).unwrap();
//! assert!(outcome.advanced());
//! assert_eq!((game.turn, game.active_player), (2, 1));
//! ```

pub mod error;
pub mod game;
pub mod lobby;
pub mod render;
pub mod script;
pub mod simulate;
pub mod snapshot;
pub mod wire;

pub use error::{ActionError, ActionResult};

// Re-export key game types at crate root for convenience
pub use game::{
    Action, ActionOutcome, Board, Cast, Cell, CellType, Coord, Element, GameState, PlayerId,
    RuleConfig, Spell,
};
pub use snapshot::{GameSnapshot, GameSoa};
pub use wire::{respond, ActionRequest, ActionResponse};
