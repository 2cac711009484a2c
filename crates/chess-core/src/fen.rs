//! FEN (Forsyth-Edwards Notation) parsing.

use crate::{Piece, PieceKind, Side, Square};
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 fields, got {0}")]
    FieldCount(usize),

    #[error("invalid piece placement: {0}")]
    Placement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    ActiveColor(String),

    #[error("invalid castling rights: {0}")]
    Castling(String),

    #[error("invalid en passant square: {0}")]
    EnPassant(String),

    #[error("invalid move counter: {0}")]
    Counter(String),

    #[error("{side} has {count} kings, expected exactly one")]
    KingCount { side: Side, count: usize },
}

/// The fields of a FEN record, decoded and validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    /// Piece on each square, indexed a1 = 0 .. h8 = 63.
    pub board: [Option<Piece>; 64],
    pub side_to_move: Side,
    /// Castling availability as `[white O-O, white O-O-O, black O-O, black O-O-O]`.
    pub castling: [bool; 4],
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Fen {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses and validates a FEN string.
    ///
    /// The halfmove clock and fullmove number may be omitted; they default to
    /// `0` and `1`.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 4 && fields.len() != 6 {
            return Err(FenError::FieldCount(fields.len()));
        }

        let board = parse_placement(fields[0])?;
        let side_to_move =
            Side::from_fen(fields[1]).ok_or_else(|| FenError::ActiveColor(fields[1].to_string()))?;
        let castling = parse_castling(fields[2])?;
        let en_passant = parse_en_passant(fields[3])?;

        let (halfmove_clock, fullmove_number) = if fields.len() == 6 {
            (parse_counter(fields[4])?, parse_counter(fields[5])?)
        } else {
            (0, 1)
        };

        for side in Side::BOTH {
            let count = board
                .iter()
                .flatten()
                .filter(|p| p.kind == PieceKind::King && p.side == side)
                .count();
            if count != 1 {
                return Err(FenError::KingCount { side, count });
            }
        }

        Ok(Fen {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }
}

fn parse_placement(placement: &str) -> Result<[Option<Piece>; 64], FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::Placement(format!(
            "expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    let mut board = [None; 64];
    for (i, row) in ranks.iter().enumerate() {
        let rank = 7 - i as u8;
        let mut file = 0u8;
        for c in row.chars() {
            if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                file += skip as u8;
            } else if let Some(piece) = Piece::from_fen_char(c) {
                let sq = Square::new(file, rank).ok_or_else(|| {
                    FenError::Placement(format!("rank {} is longer than 8 squares", rank + 1))
                })?;
                board[sq.index()] = Some(piece);
                file += 1;
            } else {
                return Err(FenError::Placement(format!(
                    "invalid character '{}' in rank {}",
                    c,
                    rank + 1
                )));
            }
            if file > 8 {
                return Err(FenError::Placement(format!(
                    "rank {} is longer than 8 squares",
                    rank + 1
                )));
            }
        }
        if file != 8 {
            return Err(FenError::Placement(format!(
                "rank {} has {} squares, expected 8",
                rank + 1,
                file
            )));
        }
    }
    Ok(board)
}

fn parse_castling(field: &str) -> Result<[bool; 4], FenError> {
    let mut rights = [false; 4];
    if field == "-" {
        return Ok(rights);
    }
    for c in field.chars() {
        let slot = match c {
            'K' => 0,
            'Q' => 1,
            'k' => 2,
            'q' => 3,
            _ => return Err(FenError::Castling(format!("invalid character '{}'", c))),
        };
        rights[slot] = true;
    }
    Ok(rights)
}

fn parse_en_passant(field: &str) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    match Square::from_algebraic(field) {
        Some(sq) if sq.rank() == 2 || sq.rank() == 5 => Ok(Some(sq)),
        _ => Err(FenError::EnPassant(field.to_string())),
    }
}

fn parse_counter(field: &str) -> Result<u32, FenError> {
    field
        .parse::<u32>()
        .map_err(|_| FenError::Counter(field.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_startpos() {
        let fen = Fen::parse(Fen::STARTPOS).unwrap();
        assert_eq!(fen.side_to_move, Side::White);
        assert_eq!(fen.castling, [true; 4]);
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
        assert_eq!(
            fen.board[Square::E1.index()],
            Some(Piece::new(PieceKind::King, Side::White))
        );
        assert_eq!(fen.board.iter().flatten().count(), 32);
    }

    #[test]
    fn parse_without_counters() {
        let fen = Fen::parse("4k3/8/8/8/8/8/8/4K3 b - -").unwrap();
        assert_eq!(fen.side_to_move, Side::Black);
        assert_eq!(fen.fullmove_number, 1);
    }

    #[test]
    fn parse_en_passant_square() {
        let fen = Fen::parse("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
        assert_eq!(fen.en_passant, Square::from_algebraic("e3"));
        assert!(matches!(
            Fen::parse("4k3/8/8/8/8/8/8/4K3 w - e4 0 1"),
            Err(FenError::EnPassant(_))
        ));
    }

    #[test]
    fn rejects_bad_fields() {
        assert!(matches!(Fen::parse("invalid"), Err(FenError::FieldCount(1))));
        assert!(matches!(
            Fen::parse("4k3/8/8/8/8/8/8/4K3 x - - 0 1"),
            Err(FenError::ActiveColor(_))
        ));
        assert!(matches!(
            Fen::parse("4k3/8/8/8/8/8/8/4K3 w XYZ - 0 1"),
            Err(FenError::Castling(_))
        ));
        assert!(matches!(
            Fen::parse("4k3/8/8/8/8/8/8/4K3 w - - abc 1"),
            Err(FenError::Counter(_))
        ));
    }

    #[test]
    fn rejects_bad_placement() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::Placement(_))
        ));
        assert!(matches!(
            Fen::parse("rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::Placement(_))
        ));
        assert!(matches!(
            Fen::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::Placement(_))
        ));
        assert!(matches!(
            Fen::parse("4k3/8/8/8/8/8/8/4K2 w - - 0 1"),
            Err(FenError::Placement(_))
        ));
    }

    #[test]
    fn requires_one_king_per_side() {
        assert_eq!(
            Fen::parse("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::KingCount {
                side: Side::Black,
                count: 0
            })
        );
        assert!(matches!(
            Fen::parse("k6k/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::KingCount { count: 2, .. })
        ));
    }

    #[test]
    fn error_display() {
        let err = FenError::ActiveColor("x".to_string());
        assert!(err.to_string().contains('x'));
        let err = FenError::KingCount {
            side: Side::White,
            count: 2,
        };
        assert_eq!(err.to_string(), "White has 2 kings, expected exactly one");
    }
}
