//! Rule set abstraction.
//!
//! The engine delegates game-level decisions (legal moves, check, results) to
//! a [`RuleSet`], so front-ends can be handed the rules as a capability rather
//! than reaching for a global.

mod standard;

pub use standard::{is_insufficient_material, StandardChess};

use crate::position::Undo;
use crate::{MoveList, Position};
use chess_core::{Move, Side, Square};
use serde::Serialize;
use std::fmt;

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "reason", rename_all = "snake_case")]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw(DrawReason),
}

impl GameResult {
    /// The result when `side` is checkmated or resigns.
    pub const fn loss_for(side: Side) -> Self {
        match side {
            Side::White => GameResult::BlackWins,
            Side::Black => GameResult::WhiteWins,
        }
    }

    pub const fn winner(self) -> Option<Side> {
        match self {
            GameResult::WhiteWins => Some(Side::White),
            GameResult::BlackWins => Some(Side::Black),
            GameResult::Draw(_) => None,
        }
    }

    pub const fn is_draw(self) -> bool {
        matches!(self, GameResult::Draw(_))
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::WhiteWins => f.write_str("1-0"),
            GameResult::BlackWins => f.write_str("0-1"),
            GameResult::Draw(_) => f.write_str("1/2-1/2"),
        }
    }
}

/// Reason for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawReason {
    /// No legal moves but not in check.
    Stalemate,
    InsufficientMaterial,
    /// 100 half-moves without a pawn move or capture; claimable.
    FiftyMoveRule,
    /// 150 half-moves; automatic.
    SeventyFiveMoveRule,
    /// Claimable.
    ThreefoldRepetition,
    /// Automatic.
    FivefoldRepetition,
}

/// Game rules as a swappable capability.
///
/// # Example
///
/// ```
/// use chess_engine::{RuleSet, StandardChess};
///
/// let position = StandardChess.initial_position();
/// assert_eq!(StandardChess.generate_moves(&position).len(), 20);
/// ```
pub trait RuleSet: Send + Sync {
    fn initial_position(&self) -> Position;

    /// All legal moves for the side to move.
    fn generate_moves(&self, position: &Position) -> MoveList;

    /// Legal moves of the piece on `from`; empty for an empty square or a
    /// piece of the side not to move.
    fn moves_from(&self, position: &Position, from: Square) -> MoveList;

    fn is_legal(&self, position: &Position, m: Move) -> bool {
        self.moves_from(position, m.from).as_slice().contains(&m)
    }

    /// Plays a move generated for `position` in place.
    fn make_move(&self, position: &mut Position, m: Move) -> Undo {
        position.make_move(m)
    }

    /// Takes back a move played with [`make_move`](RuleSet::make_move).
    fn unmake_move(&self, position: &mut Position, m: Move, undo: Undo) {
        position.unmake_move(m, undo)
    }

    fn is_check(&self, position: &Position) -> bool;

    /// The result if the game is over.
    ///
    /// Only conditions visible in a single position are detected: checkmate,
    /// stalemate, the 75-move rule and insufficient material. Repetition
    /// needs history; see [`Game`](crate::Game).
    fn game_result(&self, position: &Position) -> Option<GameResult>;

    fn is_game_over(&self, position: &Position) -> bool {
        self.game_result(position).is_some()
    }

    fn is_insufficient_material(&self, position: &Position) -> bool;
}
