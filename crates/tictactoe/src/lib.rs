//! Tic-tac-toe.
//!
//! ```
//! use tictactoe::{Board, Mark, Outcome};
//!
//! let mut board = Board::new();
//! for cell in [0, 3, 1, 4, 2] {
//!     board.place(cell).unwrap();
//! }
//! assert_eq!(board.outcome(), Outcome::Won { mark: Mark::X, line: [0, 1, 2] });
//! ```

mod ai;
mod board;

pub use ai::{Difficulty, LineScore, ParseDifficultyError};
pub use board::{Board, Mark, Outcome, ParseBoardError, PlaceError, WIN_LINES};
