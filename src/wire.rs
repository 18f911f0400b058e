//! Action requests and responses as exchanged with clients.
//!
//! Requests arrive loosely typed (`type`, `spell`, `from`, `to`) and are
//! parsed into an [`Action`] before the engine sees them. The boundary never
//! fails: a rejected request yields `ok: false` and the unchanged snapshot.

use serde::{Deserialize, Serialize};

use crate::error::{ActionError, ActionResult};
use crate::game::{Action, Cast, Coord, GameState, PlayerId, Spell};
use crate::snapshot::GameSoa;

/// A board position as sent by clients. May lie off the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Row.
    pub row: i64,
    /// Column.
    pub col: i64,
}

impl Position {
    fn to_coord(self) -> ActionResult<Coord> {
        Coord::checked(self.row, self.col).ok_or(ActionError::OutOfBounds {
            row: self.row,
            col: self.col,
        })
    }
}

impl From<Coord> for Position {
    fn from(coord: Coord) -> Self {
        Self {
            row: i64::try_from(coord.row).unwrap_or(i64::MAX),
            col: i64::try_from(coord.col).unwrap_or(i64::MAX),
        }
    }
}

/// An action as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionRequest {
    /// One of `skip`, `spell`, `move`, `attack`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Spell code, for `spell` requests.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub spell: String,
    /// Source cell, for `move` and `attack`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Position>,
    /// Target cell, for targeted spells, `move` and `attack`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Position>,
}

impl ActionRequest {
    /// Parse into a typed action.
    ///
    /// Fields the kind does not use are ignored.
    ///
    /// # Errors
    ///
    /// Returns a malformed-input [`ActionError`] for an unknown kind or spell,
    /// a missing coordinate, or a coordinate off the board.
    pub fn parse(&self) -> ActionResult<Action> {
        let from = || -> ActionResult<Coord> {
            self.from
                .ok_or(ActionError::MissingCoordinate("from"))?
                .to_coord()
        };
        let to = || -> ActionResult<Coord> {
            self.to
                .ok_or(ActionError::MissingCoordinate("to"))?
                .to_coord()
        };

        match self.kind.as_str() {
            "skip" => Ok(Action::Skip),
            "move" => Ok(Action::Move {
                from: from()?,
                to: to()?,
            }),
            "attack" => Ok(Action::Attack {
                from: from()?,
                to: to()?,
            }),
            "spell" => {
                let spell: Spell = self.spell.parse()?;
                let target = match spell {
                    Spell::DoubleTurn => None,
                    _ => Some(to()?),
                };
                Ok(Action::Cast(Cast::new(spell, target)?))
            }
            other => Err(ActionError::UnknownKind(other.to_string())),
        }
    }
}

impl From<&Action> for ActionRequest {
    fn from(action: &Action) -> Self {
        let request = |kind: &str| Self {
            kind: kind.to_string(),
            ..Self::default()
        };
        match *action {
            Action::Skip => request("skip"),
            Action::Move { from, to } => Self {
                from: Some(from.into()),
                to: Some(to.into()),
                ..request("move")
            },
            Action::Attack { from, to } => Self {
                from: Some(from.into()),
                to: Some(to.into()),
                ..request("attack")
            },
            Action::Cast(cast) => Self {
                spell: cast.spell().code().to_string(),
                to: cast.target().map(Position::from),
                ..request("spell")
            },
        }
    }
}

/// Reply to an action request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    /// Whether the action was applied.
    pub ok: bool,
    /// Snapshot after the action (unchanged on rejection).
    pub game_soa: GameSoa,
}

/// Parse and apply a request, folding any rejection into `ok: false`.
pub fn respond(state: &mut GameState, player: PlayerId, request: &ActionRequest) -> ActionResponse {
    let ok = match request.parse() {
        Ok(action) => state.apply(player, &action).is_ok(),
        Err(err) => {
            tracing::debug!(player, %err, "malformed action");
            false
        }
    };
    ActionResponse {
        ok,
        game_soa: GameSoa::from(&*state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, Cell, Element};

    fn request(json: &str) -> ActionRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_kinds() {
        assert_eq!(request(r#"{"type": "skip"}"#).parse(), Ok(Action::Skip));
        assert_eq!(
            request(r#"{"type": "move", "from": {"row": 1, "col": 2}, "to": {"row": 3, "col": 4}}"#)
                .parse(),
            Ok(Action::Move {
                from: Coord::new(1, 2),
                to: Coord::new(3, 4)
            })
        );
        assert_eq!(
            request(r#"{"type": "spell", "spell": "ms", "to": {"row": 2, "col": 2}}"#).parse(),
            Ok(Action::Cast(Cast::MeteorShower(Coord::new(2, 2))))
        );
        assert_eq!(
            request(r#"{"type": "spell", "spell": "dt"}"#).parse(),
            Ok(Action::Cast(Cast::DoubleTurn))
        );
    }

    #[test]
    fn test_skip_ignores_other_fields() {
        let req = request(r#"{"type": "skip", "spell": "zz", "from": {"row": -5, "col": 99}}"#);
        assert_eq!(req.parse(), Ok(Action::Skip));
    }

    #[test]
    fn test_malformed_requests() {
        let cases = [
            (r#"{"type": "dance"}"#, ActionError::UnknownKind("dance".into())),
            (
                r#"{"type": "spell", "spell": "xx", "to": {"row": 1, "col": 1}}"#,
                ActionError::UnknownSpell("xx".into()),
            ),
            (
                r#"{"type": "attack", "to": {"row": 1, "col": 1}}"#,
                ActionError::MissingCoordinate("from"),
            ),
            (
                r#"{"type": "spell", "spell": "fs"}"#,
                ActionError::MissingCoordinate("to"),
            ),
            (
                r#"{"type": "move", "from": {"row": -1, "col": 0}, "to": {"row": 0, "col": 0}}"#,
                ActionError::OutOfBounds { row: -1, col: 0 },
            ),
        ];
        for (json, expected) in cases {
            let err = request(json).parse().unwrap_err();
            assert!(err.is_malformed(), "{json}");
            assert_eq!(err, expected, "{json}");
        }
    }

    #[test]
    fn test_request_from_action_round_trip() {
        let actions = [
            Action::Skip,
            Action::Attack {
                from: Coord::new(5, 5),
                to: Coord::new(6, 6),
            },
            Action::Cast(Cast::HealingVial(Coord::new(9, 0))),
            Action::Cast(Cast::DoubleTurn),
        ];
        for action in actions {
            assert_eq!(ActionRequest::from(&action).parse(), Ok(action));
        }
    }

    #[test]
    fn test_request_serializes_without_unused_fields() {
        let json = serde_json::to_value(ActionRequest::from(&Action::Skip)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "skip"}));
    }

    #[test]
    fn test_respond_reports_rejection_with_unchanged_state() {
        let mut board = Board::new();
        board[Coord::new(2, 3)] = Cell::elemental(Element::Fire, 1);
        board[Coord::new(9, 3)] = Cell::elemental(Element::Water, 1);
        let mut game = GameState::new(board);
        let before = GameSoa::from(&game);

        let attack = request(
            r#"{"type": "attack", "from": {"row": 2, "col": 3}, "to": {"row": 9, "col": 3}}"#,
        );
        let response = respond(&mut game, 0, &attack);
        assert!(!response.ok);
        assert_eq!(response.game_soa, before);

        let response = respond(&mut game, 0, &request(r#"{"type": "skip"}"#));
        assert!(response.ok);
        assert_eq!(response.game_soa.turn, 2);
        assert_eq!(response.game_soa.active_player, 1);
    }

    #[test]
    fn test_respond_wrong_turn() {
        let mut game = GameState::new(Board::new());
        let response = respond(&mut game, 1, &request(r#"{"type": "skip"}"#));
        assert!(!response.ok);
        assert_eq!(response.game_soa.turn, 1);
    }

    #[test]
    fn test_response_field_names() {
        let mut game = GameState::new(Board::new());
        let response = respond(&mut game, 0, &request(r#"{"type": "skip"}"#));
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["ok"], true);
        assert!(json["game_soa"]["board_soa"].is_object());
    }
}
