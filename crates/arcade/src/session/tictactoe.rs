use super::{MoveOutcome, Phase};
use crate::error::ArcadeError;
use game_search::{Ai, SearchOutcome};
use serde::Serialize;
use tictactoe::{Board, Difficulty, LineScore, Mark, Outcome, ParseDifficultyError};

/// Tic-tac-toe with the player on X, moving first.
pub struct TicTacToeSession {
    board: Board,
    human: Mark,
    difficulty: Difficulty,
    ai: Ai,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicTacToeSnapshot {
    pub cells: [Option<Mark>; 9],
    pub human: Mark,
    pub to_move: Mark,
    pub difficulty: Difficulty,
    pub phase: Phase,
    pub outcome: Outcome,
    pub status: String,
}

impl TicTacToeSession {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        TicTacToeSession {
            board: Board::new(),
            human: Mark::X,
            difficulty,
            ai: Ai::new(difficulty.policy(), seed),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn phase(&self) -> Phase {
        if self.board.outcome() != Outcome::InProgress {
            Phase::Terminal
        } else if self.board.to_move() == self.human {
            Phase::AwaitingHuman
        } else {
            Phase::AwaitingAi
        }
    }

    pub fn reset(&mut self) {
        self.board = Board::new();
    }

    /// Changes how the computer plays from its next move on.
    pub fn set_difficulty(&mut self, level: &str) -> Result<MoveOutcome, ArcadeError> {
        let difficulty: Difficulty = level
            .parse()
            .map_err(|e: ParseDifficultyError| ArcadeError::invalid(e.to_string()))?;
        if difficulty == self.difficulty {
            return Ok(MoveOutcome::Ignored);
        }
        self.difficulty = difficulty;
        self.ai.set_policy(difficulty.policy());
        Ok(MoveOutcome::Applied)
    }

    /// Marks `cell` for the player. Taken cells, finished games and the
    /// computer's turn are ignored.
    pub fn place(&mut self, cell: usize) -> Result<MoveOutcome, ArcadeError> {
        if cell >= 9 {
            return Err(ArcadeError::invalid(format!(
                "cell {} is off the board, expected 0 to 8",
                cell
            )));
        }
        if self.phase() != Phase::AwaitingHuman {
            return Ok(MoveOutcome::Ignored);
        }
        match self.board.place(cell) {
            Ok(()) => {
                self.log_if_over();
                Ok(MoveOutcome::Applied)
            }
            Err(_) => Ok(MoveOutcome::Ignored),
        }
    }

    pub fn ai_move(&mut self) -> MoveOutcome {
        if self.phase() != Phase::AwaitingAi {
            return MoveOutcome::Ignored;
        }
        let evaluator = LineScore {
            mark: self.human.opposite(),
        };
        let cell = match self.ai.choose(&mut self.board, &evaluator, None) {
            SearchOutcome::Chosen(choice) => choice.mv,
            SearchOutcome::Terminal | SearchOutcome::Cancelled => return MoveOutcome::Ignored,
        };
        tracing::debug!(cell, difficulty = ?self.difficulty, "tic-tac-toe computer move");
        match self.board.place(cell) {
            Ok(()) => {
                self.log_if_over();
                MoveOutcome::Applied
            }
            Err(e) => {
                debug_assert!(false, "search chose an unplayable cell: {e}");
                MoveOutcome::Ignored
            }
        }
    }

    fn log_if_over(&self) {
        match self.board.outcome() {
            Outcome::InProgress => {}
            outcome => tracing::info!(?outcome, "tic-tac-toe game over"),
        }
    }

    pub fn status(&self) -> String {
        match self.board.outcome() {
            Outcome::Won { mark, .. } if mark == self.human => "You win!".to_string(),
            Outcome::Won { .. } => "AI wins!".to_string(),
            Outcome::Draw => "Game ended in a draw!".to_string(),
            Outcome::InProgress if self.board.to_move() == self.human => {
                format!("Your turn ({})", self.human)
            }
            Outcome::InProgress => format!("AI's turn ({})", self.human.opposite()),
        }
    }

    pub fn snapshot(&self) -> TicTacToeSnapshot {
        TicTacToeSnapshot {
            cells: *self.board.cells(),
            human: self.human,
            to_move: self.board.to_move(),
            difficulty: self.difficulty,
            phase: self.phase(),
            outcome: self.board.outcome(),
            status: self.status(),
        }
    }
}
