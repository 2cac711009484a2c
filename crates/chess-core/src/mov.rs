//! Move representation.

use crate::{PieceKind, Square};
use std::fmt;

/// Classification of a move, carrying whatever the apply step needs to know
/// beyond the two squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    /// Non-capturing move with no special side effect.
    Quiet,
    /// Pawn advances two squares from its starting rank.
    DoublePush,
    /// Captures the piece standing on the destination square.
    Capture,
    /// Pawn captures the pawn that just double-pushed past it.
    EnPassant,
    /// King moves two squares toward the h-file rook (O-O).
    CastleKingside,
    /// King moves two squares toward the a-file rook (O-O-O).
    CastleQueenside,
    /// Pawn reaches the last rank on an empty square.
    Promotion,
    /// Pawn reaches the last rank by capturing.
    PromotionCapture,
}

impl MoveKind {
    #[inline]
    pub const fn is_capture(self) -> bool {
        matches!(
            self,
            MoveKind::Capture | MoveKind::EnPassant | MoveKind::PromotionCapture
        )
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        matches!(self, MoveKind::Promotion | MoveKind::PromotionCapture)
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        matches!(self, MoveKind::CastleKingside | MoveKind::CastleQueenside)
    }
}

/// A fully classified chess move, as produced by move generation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
    /// Piece the pawn becomes; `Some` exactly when `kind.is_promotion()`.
    pub promotion: Option<PieceKind>,
}

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square, kind: MoveKind) -> Self {
        Move {
            from,
            to,
            kind,
            promotion: None,
        }
    }

    #[inline]
    pub const fn promote(from: Square, to: Square, piece: PieceKind, capture: bool) -> Self {
        Move {
            from,
            to,
            kind: if capture {
                MoveKind::PromotionCapture
            } else {
                MoveKind::Promotion
            },
            promotion: Some(piece),
        }
    }

    /// UCI text for the move (`e2e4`, `e7e8q`).
    pub fn to_uci(self) -> String {
        match self.promotion {
            Some(piece) => format!("{}{}{}", self.from, self.to, piece.letter()),
            None => format!("{}{}", self.from, self.to),
        }
    }

    /// Returns true if this move is what `input` asks for.
    ///
    /// A request without a promotion piece matches the queen promotion, so a
    /// front-end that never asks which piece to promote to gets a queen.
    pub fn matches(self, input: &MoveInput) -> bool {
        if self.from != input.from || self.to != input.to {
            return false;
        }
        match (self.promotion, input.promotion) {
            (None, None) => true,
            (Some(piece), Some(wanted)) => piece == wanted,
            (Some(piece), None) => piece == PieceKind::Queen,
            (None, Some(_)) => false,
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} {:?})", self.to_uci(), self.kind)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}

/// An unclassified move request: the squares a user picked plus an optional
/// promotion choice. Resolved against the legal move list by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveInput {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl MoveInput {
    pub const fn new(from: Square, to: Square) -> Self {
        MoveInput {
            from,
            to,
            promotion: None,
        }
    }

    /// Parses UCI text. Only n, b, r and q are accepted as promotion suffixes.
    pub fn from_uci(s: &str) -> Option<Self> {
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match PieceKind::from_letter(c)? {
                PieceKind::Pawn | PieceKind::King => return None,
                piece => Some(piece),
            },
        };
        Some(MoveInput {
            from,
            to,
            promotion,
        })
    }
}

impl From<Move> for MoveInput {
    fn from(m: Move) -> Self {
        MoveInput {
            from: m.from,
            to: m.to,
            promotion: m.promotion,
        }
    }
}
