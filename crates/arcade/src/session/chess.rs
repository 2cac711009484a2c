//! Chess against the computer, driven by square clicks.

use super::{MoveOutcome, Phase};
use crate::capabilities::Confirm;
use crate::error::ArcadeError;
use chess_core::{Move, MoveInput, Side, Square};
use chess_engine::{Game, GameResult, RuleSet};
use game_search::{Ai, Policy, SearchOutcome};
use serde::Serialize;
use std::sync::Arc;

pub const SWITCH_SIDES_PROMPT: &str = "Switching sides will restart the game. Proceed?";

pub struct ChessSession {
    rules: Arc<dyn RuleSet>,
    game: Game,
    human: Side,
    ai: Ai,
    selected: Option<Square>,
    /// Legal moves of the selected piece.
    targets: Vec<Move>,
    last_move: Option<Move>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChessSnapshot {
    pub fen: String,
    /// FEN piece letters, rank 8 first, file a first in each rank.
    pub board: Vec<Vec<Option<char>>>,
    pub human: Side,
    pub side_to_move: Side,
    pub phase: Phase,
    pub selected: Option<Square>,
    pub targets: Vec<Square>,
    pub last_move: Option<String>,
    pub check: bool,
    pub result: Option<GameResult>,
    pub status: String,
}

impl ChessSession {
    /// A new game with the player on White.
    pub fn new(rules: Arc<dyn RuleSet>, depth: u8, seed: u64) -> Self {
        ChessSession {
            game: Game::with_rules(rules.clone()),
            rules,
            human: Side::White,
            ai: Ai::new(Policy::Minimax { depth }, seed),
            selected: None,
            targets: Vec::new(),
            last_move: None,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn human(&self) -> Side {
        self.human
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// Destination squares of the selected piece.
    pub fn targets(&self) -> Vec<Square> {
        let mut squares: Vec<Square> = self.targets.iter().map(|m| m.to).collect();
        // Promotions list each destination four times.
        squares.dedup();
        squares
    }

    pub fn phase(&self) -> Phase {
        if self.game.is_game_over() {
            Phase::Terminal
        } else if self.game.side_to_move() == self.human {
            Phase::AwaitingHuman
        } else {
            Phase::AwaitingAi
        }
    }

    /// Starts over with the same sides. With the player on Black the
    /// computer moves first.
    pub fn reset(&mut self) {
        self.game = Game::with_rules(self.rules.clone());
        self.last_move = None;
        self.clear_selection();
    }

    /// Handles a click on `square`.
    ///
    /// With nothing selected, clicking one of the player's pieces selects it.
    /// With a piece selected, clicking it again deselects, clicking one of
    /// its destinations plays the move (promoting to a queen), clicking
    /// another own piece selects that one, and anything else deselects.
    pub fn select(&mut self, square: &str) -> Result<MoveOutcome, ArcadeError> {
        let sq = Square::from_algebraic(square.trim()).ok_or_else(|| {
            ArcadeError::invalid(format!("'{}' is not a square, expected a1 to h8", square))
        })?;
        if self.phase() != Phase::AwaitingHuman {
            return Ok(MoveOutcome::Ignored);
        }

        if let Some(from) = self.selected {
            if from == sq {
                self.clear_selection();
                return Ok(MoveOutcome::Applied);
            }
            if self.targets.iter().any(|m| m.to == sq) {
                return Ok(self.apply_human(MoveInput::new(from, sq)));
            }
        }

        match self.game.position().piece_at(sq) {
            Some(piece) if piece.side == self.human => {
                self.selected = Some(sq);
                self.targets = self.game.legal_moves_from(sq).as_slice().to_vec();
                Ok(MoveOutcome::Applied)
            }
            _ if self.selected.is_some() => {
                self.clear_selection();
                Ok(MoveOutcome::Applied)
            }
            _ => Ok(MoveOutcome::Ignored),
        }
    }

    /// Plays a move given as UCI text. Illegal moves are ignored.
    pub fn play(&mut self, uci: &str) -> Result<MoveOutcome, ArcadeError> {
        let input = MoveInput::from_uci(uci.trim()).ok_or_else(|| {
            ArcadeError::invalid(format!("'{}' is not a move, expected e.g. e2e4", uci))
        })?;
        if self.phase() != Phase::AwaitingHuman {
            return Ok(MoveOutcome::Ignored);
        }
        Ok(self.apply_human(input))
    }

    fn apply_human(&mut self, input: MoveInput) -> MoveOutcome {
        match self.game.play(input) {
            Ok(mv) => {
                self.after_move(mv);
                MoveOutcome::Applied
            }
            Err(_) => MoveOutcome::Ignored,
        }
    }

    /// Searches for and plays the computer's move.
    pub fn ai_move(&mut self) -> MoveOutcome {
        if self.phase() != Phase::AwaitingAi {
            return MoveOutcome::Ignored;
        }
        match self.game.think(&mut self.ai, None) {
            SearchOutcome::Chosen(choice) => {
                tracing::debug!(
                    mv = %choice.mv,
                    score = ?choice.score,
                    nodes = choice.nodes,
                    "chess computer move"
                );
                match self.game.make_move(choice.mv) {
                    Ok(()) => {
                        self.after_move(choice.mv);
                        MoveOutcome::Applied
                    }
                    Err(e) => {
                        debug_assert!(false, "search chose an unplayable move: {e}");
                        MoveOutcome::Ignored
                    }
                }
            }
            SearchOutcome::Terminal | SearchOutcome::Cancelled => MoveOutcome::Ignored,
        }
    }

    /// Switches the player to `side`. Once moves have been played this asks
    /// `confirm` first, and a refusal leaves the game untouched.
    pub fn choose_side(
        &mut self,
        side: Side,
        confirm: Option<&mut dyn Confirm>,
    ) -> Result<MoveOutcome, ArcadeError> {
        if side == self.human {
            return Ok(MoveOutcome::Ignored);
        }
        if self.game.ply_count() > 0 {
            let confirm = confirm.ok_or(ArcadeError::MissingCapability("confirmation prompt"))?;
            if !confirm.confirm(SWITCH_SIDES_PROMPT) {
                return Ok(MoveOutcome::Ignored);
            }
        }
        self.human = side;
        self.reset();
        tracing::info!(side = %side, "chess player switched sides");
        Ok(MoveOutcome::Applied)
    }

    fn after_move(&mut self, mv: Move) {
        self.last_move = Some(mv);
        self.clear_selection();
        if let Some(result) = self.game.result() {
            tracing::info!(result = %result, plies = self.game.ply_count(), "chess game over");
        }
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.targets.clear();
    }

    pub fn status(&self) -> String {
        match self.game.result() {
            Some(GameResult::Draw(_)) => "Game over, drawn position".to_string(),
            Some(_) => format!(
                "Game over, {} is in checkmate.",
                self.game.side_to_move()
            ),
            None if self.phase() == Phase::AwaitingAi => "AI is thinking...".to_string(),
            None if self.game.is_check() => "Your turn (Check!)".to_string(),
            None => "Your turn".to_string(),
        }
    }

    pub fn snapshot(&self) -> ChessSnapshot {
        let position = self.game.position();
        let board = (0..8u8)
            .rev()
            .map(|rank| {
                (0..8u8)
                    .map(|file| {
                        Square::new(file, rank)
                            .and_then(|sq| position.piece_at(sq))
                            .map(|p| p.to_fen_char())
                    })
                    .collect()
            })
            .collect();
        ChessSnapshot {
            fen: self.game.to_fen(),
            board,
            human: self.human,
            side_to_move: self.game.side_to_move(),
            phase: self.phase(),
            selected: self.selected,
            targets: self.targets(),
            last_move: self.last_move.map(Move::to_uci),
            check: self.game.is_check(),
            result: self.game.result(),
            status: self.status(),
        }
    }
}
