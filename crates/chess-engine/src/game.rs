//! Full game management with history tracking.
//!
//! [`Game`] wraps a [`Position`] with what a single position cannot know:
//! the moves that led to it, repetition counts and claimed draws.

use crate::eval::{Material, RuledPosition};
use crate::rules::{DrawReason, GameResult, RuleSet, StandardChess};
use crate::{MoveList, Position};
use chess_core::{FenError, Move, MoveInput, Piece, Side, Square};
use game_search::{Ai, CancelToken, SearchOutcome};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A move in the game record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameMove {
    pub mv: Move,
    pub side: Side,
    pub captured: Option<Piece>,
    /// Zobrist key of the position before the move.
    pub hash_before: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("invalid move text: {0}")]
    InvalidUci(String),

    #[error("game has already ended")]
    GameAlreadyOver,

    #[error("cannot claim draw: conditions not met")]
    CannotClaimDraw,

    #[error(transparent)]
    Fen(#[from] FenError),
}

/// A chess game with history, played under a [`RuleSet`].
#[derive(Clone)]
pub struct Game {
    rules: Arc<dyn RuleSet>,
    position: Position,
    /// Keys of every position reached, the current one last.
    history: Vec<u64>,
    moves: Vec<GameMove>,
    result: Option<GameResult>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("position", &self.position)
            .field("moves", &self.moves.len())
            .field("result", &self.result)
            .finish()
    }
}

impl Game {
    /// A new game from the standard starting position.
    pub fn new() -> Self {
        Self::with_rules(Arc::new(StandardChess))
    }

    /// A new game from the rule set's initial position.
    pub fn with_rules(rules: Arc<dyn RuleSet>) -> Self {
        let position = rules.initial_position();
        Self::from_position(rules, position)
    }

    pub fn from_position(rules: Arc<dyn RuleSet>, position: Position) -> Self {
        let mut game = Game {
            rules,
            history: vec![position.zobrist_hash()],
            position,
            moves: Vec::new(),
            result: None,
        };
        game.check_game_end();
        game
    }

    /// A game under standard rules from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        let position = Position::from_fen(fen)?;
        Ok(Self::from_position(Arc::new(StandardChess), position))
    }

    pub fn rules(&self) -> &Arc<dyn RuleSet> {
        &self.rules
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn side_to_move(&self) -> Side {
        self.position.side_to_move()
    }

    pub fn legal_moves(&self) -> MoveList {
        self.rules.generate_moves(&self.position)
    }

    /// Legal moves of the piece on `from`. Empty once the game is over.
    pub fn legal_moves_from(&self, from: Square) -> MoveList {
        if self.result.is_some() {
            return MoveList::new();
        }
        self.rules.moves_from(&self.position, from)
    }

    pub fn is_check(&self) -> bool {
        self.rules.is_check(&self.position)
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    pub fn move_history(&self) -> &[GameMove] {
        &self.moves
    }

    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    /// Plays a fully classified move.
    pub fn make_move(&mut self, m: Move) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyOver);
        }
        if !self.rules.is_legal(&self.position, m) {
            return Err(GameError::IllegalMove(m.to_uci()));
        }
        self.apply_move(m);
        Ok(())
    }

    /// Resolves a square-pair request against the legal moves and plays it.
    /// A promotion without a chosen piece becomes a queen.
    pub fn play(&mut self, input: MoveInput) -> Result<Move, GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyOver);
        }
        let found = self
            .rules
            .moves_from(&self.position, input.from)
            .as_slice()
            .iter()
            .copied()
            .find(|m| m.matches(&input));
        match found {
            Some(m) => {
                self.apply_move(m);
                Ok(m)
            }
            None => Err(GameError::IllegalMove(format!(
                "{}{}",
                input.from, input.to
            ))),
        }
    }

    /// Plays a move given in UCI notation (`e2e4`, `e7e8q`).
    pub fn make_move_uci(&mut self, uci: &str) -> Result<Move, GameError> {
        let input =
            MoveInput::from_uci(uci).ok_or_else(|| GameError::InvalidUci(uci.to_string()))?;
        self.play(input)
    }

    /// Asks `ai` for a move for the side to move, scoring positions by
    /// material for that side. The search runs under the game's rules on the
    /// position in place, which is unchanged afterwards; the move is not
    /// played.
    pub fn think(&mut self, ai: &mut Ai, cancel: Option<&CancelToken>) -> SearchOutcome<Move> {
        if self.result.is_some() {
            return SearchOutcome::Terminal;
        }
        let evaluator = Material::new(self.position.side_to_move());
        let mut searched = RuledPosition::new(&*self.rules, &mut self.position);
        ai.choose(&mut searched, &evaluator, cancel)
    }

    fn apply_move(&mut self, m: Move) {
        let side = self.position.side_to_move();
        let hash_before = self.position.zobrist_hash();
        let undo = self.rules.make_move(&mut self.position, m);
        self.moves.push(GameMove {
            mv: m,
            side,
            captured: undo.captured(),
            hash_before,
        });
        self.history.push(self.position.zobrist_hash());
        self.check_game_end();
    }

    fn check_game_end(&mut self) {
        if self.position_count() >= 5 {
            self.result = Some(GameResult::Draw(DrawReason::FivefoldRepetition));
            return;
        }
        self.result = self.rules.game_result(&self.position);
    }

    /// How many times the current position has occurred.
    pub fn position_count(&self) -> usize {
        let current = self.position.zobrist_hash();
        self.history.iter().filter(|&&h| h == current).count()
    }

    /// True if threefold repetition or the fifty-move rule can be claimed.
    pub fn can_claim_draw(&self) -> bool {
        self.result.is_none()
            && (self.position_count() >= 3 || self.position.halfmove_clock() >= 100)
    }

    pub fn claim_draw(&mut self) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyOver);
        }
        let reason = if self.position_count() >= 3 {
            DrawReason::ThreefoldRepetition
        } else if self.position.halfmove_clock() >= 100 {
            DrawReason::FiftyMoveRule
        } else {
            return Err(GameError::CannotClaimDraw);
        };
        self.result = Some(GameResult::Draw(reason));
        Ok(())
    }
}
