//! The two sides of a chess game.

use std::fmt;

/// Which side a piece belongs to, or whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Side {
    White = 0,
    Black = 1,
}

impl Side {
    /// Both sides, White first.
    pub const BOTH: [Side; 2] = [Side::White, Side::Black];

    /// Returns the other side.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Returns 0 for White, 1 for Black.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Rank delta of a single pawn push.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }

    /// Rank index the side's pieces start on.
    #[inline]
    pub const fn back_rank(self) -> u8 {
        match self {
            Side::White => 0,
            Side::Black => 7,
        }
    }

    /// Rank index the side's pawns start on.
    #[inline]
    pub const fn pawn_rank(self) -> u8 {
        match self {
            Side::White => 1,
            Side::Black => 6,
        }
    }

    /// Rank index where the side's pawns promote.
    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        self.opposite().back_rank()
    }

    /// FEN active-color character.
    pub const fn to_fen_char(self) -> char {
        match self {
            Side::White => 'w',
            Side::Black => 'b',
        }
    }

    /// Parses a FEN active-color token (`w` or `b`).
    pub fn from_fen(token: &str) -> Option<Self> {
        match token {
            "w" => Some(Side::White),
            "b" => Some(Side::Black),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "White"),
            Side::Black => write!(f, "Black"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_side() {
        assert_eq!(Side::White.opposite(), Side::Black);
        assert_eq!(Side::Black.opposite(), Side::White);
    }

    #[test]
    fn ranks() {
        assert_eq!(Side::White.back_rank(), 0);
        assert_eq!(Side::Black.pawn_rank(), 6);
        assert_eq!(Side::White.promotion_rank(), 7);
        assert_eq!(Side::Black.promotion_rank(), 0);
    }

    #[test]
    fn fen_token() {
        assert_eq!(Side::from_fen("w"), Some(Side::White));
        assert_eq!(Side::from_fen("b"), Some(Side::Black));
        assert_eq!(Side::from_fen("x"), None);
        assert_eq!(Side::Black.to_fen_char(), 'b');
    }

    #[test]
    fn display() {
        assert_eq!(Side::White.to_string(), "White");
        assert_eq!(Side::Black.to_string(), "Black");
    }
}
