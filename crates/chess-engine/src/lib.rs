//! Chess engine on an 8x8 mailbox board.
//!
//! This crate provides:
//! - [`Position`] - board state searched in place with make/unmake
//! - [`Game`] - a position plus history, repetition and draw handling
//! - [`RuleSet`] - the rules as an injectable capability, with [`StandardChess`]
//! - Legal move generation, attack detection and perft
//! - [`Material`] - the evaluator the computer player searches with
//!
//! # Example
//!
//! ```
//! use chess_engine::{Game, RuleSet, StandardChess};
//!
//! let position = StandardChess.initial_position();
//! assert_eq!(StandardChess.generate_moves(&position).len(), 20);
//!
//! let mut game = Game::new();
//! game.make_move_uci("e2e4").unwrap();
//! game.make_move_uci("e7e5").unwrap();
//! assert_eq!(
//!     game.to_fen(),
//!     "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2"
//! );
//! ```

mod eval;
mod game;
pub mod movegen;
mod position;
pub mod rules;
mod zobrist;

pub use eval::{piece_value, Material, RuledPosition};
pub use game::{Game, GameError, GameMove};
pub use movegen::{generate_moves, is_king_attacked, is_square_attacked, legal_moves_from, MoveList};
pub use position::{CastlingRights, Position, Undo};
pub use rules::{is_insufficient_material, DrawReason, GameResult, RuleSet, StandardChess};
