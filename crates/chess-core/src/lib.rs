//! Core chess vocabulary.
//!
//! This crate provides the types shared by the engine and the arcade sessions:
//! - [`Side`], [`PieceKind`] and [`Piece`] for piece representation
//! - [`Square`] for board coordinates
//! - [`Move`] and [`MoveInput`] for generated moves and user move requests
//! - [`Fen`] for position setup

mod fen;
mod mov;
mod piece;
mod side;
mod square;

pub use fen::{Fen, FenError};
pub use mov::{Move, MoveInput, MoveKind};
pub use piece::{Piece, PieceKind};
pub use side::Side;
pub use square::Square;
