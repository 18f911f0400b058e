//! Game state and the turn controller.

use crate::game::{
    collapse_border, merge_half, opponent, Board, MergeOutcome, PlayerId, ResourcePool,
    PLAYER_COUNT,
};

/// Rule switches that are not part of the board snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuleConfig {
    /// Reject casts whose charge counter is zero.
    ///
    /// Off by default: a spell fires regardless of charge and its counter is
    /// simply reset to zero.
    pub require_charge: bool,
}

/// What one turn advance did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    /// Half the merge pass ran on.
    pub merged_half: PlayerId,
    /// Result of the merge pass.
    pub merge: MergeOutcome,
    /// Whether border collapse converted cells.
    pub collapsed: bool,
    /// Whether a pending double turn kept the active player in place.
    pub suppressed: bool,
}

/// Complete state of one game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// The board.
    pub board: Board,
    /// Spell charges, indexed by player.
    pub pools: [ResourcePool; PLAYER_COUNT],
    /// Player whose turn it is.
    pub active_player: PlayerId,
    /// Current turn (starts at 1).
    pub turn: u32,
    /// Number of upcoming turn hand-overs to suppress.
    pub pending_skip: u8,
    /// Rule switches.
    pub rules: RuleConfig,
}

impl GameState {
    /// Create a game on `board` with full pools, player 0 to act on turn 1.
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            board,
            pools: [ResourcePool::full(); PLAYER_COUNT],
            active_player: 0,
            turn: 1,
            pending_skip: 0,
            rules: RuleConfig::default(),
        }
    }

    /// Replace the rule switches.
    #[must_use]
    pub fn with_rules(mut self, rules: RuleConfig) -> Self {
        self.rules = rules;
        self
    }

    /// Get the current turn number.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Get a player's charge pool.
    #[must_use]
    pub fn pool(&self, player: PlayerId) -> Option<&ResourcePool> {
        self.pools.get(usize::from(player))
    }

    /// Advance the turn.
    ///
    /// Merges half `turn % 2` and credits the yield to the active player.
    /// A pending double turn is consumed here and stops the cycle before
    /// border collapse, so neither the turn nor the active player changes.
    pub fn advance_turn(&mut self) -> TurnReport {
        let merged_half: PlayerId = if self.turn % 2 == 0 { 0 } else { 1 };
        let merge = merge_half(&mut self.board, merged_half);
        if merge.charge_yield > 0 {
            self.pools[usize::from(self.active_player)].top_up(merge.charge_yield);
        }

        if self.pending_skip > 0 {
            self.pending_skip -= 1;
            let report = TurnReport {
                merged_half,
                merge,
                collapsed: false,
                suppressed: true,
            };
            tracing::debug!(turn = self.turn, player = self.active_player, ?report, "double turn");
            return report;
        }

        let collapsed = collapse_border(&mut self.board, self.turn);
        self.turn += 1;
        self.active_player = opponent(self.active_player);

        let report = TurnReport {
            merged_half,
            merge,
            collapsed,
            suppressed: false,
        };
        tracing::debug!(turn = self.turn, player = self.active_player, ?report, "turn advanced");
        report
    }

    /// The player whose opponent has no elementals left, if exactly one such player exists.
    ///
    /// Play is never stopped on this; it is a query for callers.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        let low = self.board.count_elementals(0);
        let high = self.board.count_elementals(1);
        match (low, high) {
            (0, 0) => None,
            (_, 0) => Some(0),
            (0, _) => Some(1),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, CellType, Coord, Element, Spell};

    fn place(board: &mut Board, cells: &[(usize, usize)], element: Element) {
        for &(row, col) in cells {
            board[Coord::new(row, col)] = Cell::elemental(element, 1);
        }
    }

    #[test]
    fn test_new_game_defaults() {
        let game = GameState::new(Board::new());
        assert_eq!(game.turn(), 1);
        assert_eq!(game.active_player, 0);
        assert_eq!(game.pending_skip, 0);
        assert_eq!(game.pool(0), Some(&ResourcePool::full()));
        assert!(game.pool(2).is_none());
    }

    #[test]
    fn test_advance_flips_player_and_increments_turn() {
        let mut game = GameState::new(Board::new());
        let report = game.advance_turn();
        assert_eq!(report.merged_half, 1);
        assert!(!report.collapsed);
        assert_eq!((game.turn, game.active_player), (2, 1));

        let report = game.advance_turn();
        assert_eq!(report.merged_half, 0);
        assert!(report.collapsed);
        assert_eq!((game.turn, game.active_player), (3, 0));
        assert_eq!(game.board[Coord::new(0, 0)].kind, CellType::Block);
    }

    #[test]
    fn test_merge_yield_goes_to_active_player() {
        let mut board = Board::new();
        place(&mut board, &[(8, 3), (8, 4), (8, 5)], Element::Fire);
        let mut game = GameState::new(board);
        game.pools[0] = ResourcePool::default();

        let report = game.advance_turn();

        assert_eq!(report.merge.charge_yield, 1);
        assert_eq!(game.pools[0].charges(), [1; Spell::COUNT]);
        assert_eq!(game.pools[1], ResourcePool::full());
    }

    #[test]
    fn test_pending_skip_suppresses_one_advance() {
        let mut game = GameState::new(Board::new());
        game.turn = 2;
        game.pending_skip = 1;

        let report = game.advance_turn();
        assert!(report.suppressed);
        assert!(!report.collapsed);
        assert_eq!((game.turn, game.active_player, game.pending_skip), (2, 0, 0));
        assert_eq!(game.board[Coord::new(0, 0)].kind, CellType::Empty);

        let report = game.advance_turn();
        assert!(!report.suppressed);
        assert!(report.collapsed);
        assert_eq!((game.turn, game.active_player), (3, 1));
    }

    #[test]
    fn test_winner_query() {
        let mut board = Board::new();
        assert_eq!(GameState::new(board.clone()).winner(), None);

        place(&mut board, &[(2, 2)], Element::Air);
        assert_eq!(GameState::new(board.clone()).winner(), Some(0));

        place(&mut board, &[(9, 2)], Element::Air);
        assert_eq!(GameState::new(board).winner(), None);
    }
}
