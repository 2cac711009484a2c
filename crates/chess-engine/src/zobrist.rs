//! Zobrist hashing for position identification.
//!
//! A position's key is the XOR of one random value per (piece, square), one
//! for black to move, one per castling right held, and one for the file of
//! the en passant target. Moves update the key incrementally.

use crate::position::CastlingRights;
use chess_core::{Piece, Side, Square};

pub struct ZobristKeys {
    /// `[kind][side][square]`
    pieces: [[[u64; 64]; 2]; 6],
    black_to_move: u64,
    castling: [u64; 4],
    en_passant: [u64; 8],
}

impl ZobristKeys {
    /// Fills the tables from a fixed xorshift64 stream so keys are stable
    /// across runs.
    const fn new() -> Self {
        const fn next(state: u64) -> u64 {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x
        }

        let mut state = 0x9E37_79B9_7F4A_7C15u64;
        let mut pieces = [[[0u64; 64]; 2]; 6];
        let mut castling = [0u64; 4];
        let mut en_passant = [0u64; 8];

        let mut kind = 0;
        while kind < 6 {
            let mut side = 0;
            while side < 2 {
                let mut sq = 0;
                while sq < 64 {
                    state = next(state);
                    pieces[kind][side][sq] = state;
                    sq += 1;
                }
                side += 1;
            }
            kind += 1;
        }

        state = next(state);
        let black_to_move = state;

        let mut i = 0;
        while i < 4 {
            state = next(state);
            castling[i] = state;
            i += 1;
        }

        let mut i = 0;
        while i < 8 {
            state = next(state);
            en_passant[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant,
        }
    }

    #[inline]
    pub fn piece(&self, piece: Piece, sq: Square) -> u64 {
        self.pieces[piece.kind.index()][piece.side.index()][sq.index()]
    }

    #[inline]
    pub fn side(&self, side: Side) -> u64 {
        match side {
            Side::White => 0,
            Side::Black => self.black_to_move,
        }
    }

    /// Combined key of every right in `rights`.
    pub fn castling(&self, rights: CastlingRights) -> u64 {
        (0..4)
            .filter(|&i| rights.raw() & (1 << i) != 0)
            .fold(0, |key, i| key ^ self.castling[i])
    }

    #[inline]
    pub fn en_passant(&self, target: Option<Square>) -> u64 {
        match target {
            Some(sq) => self.en_passant[sq.file() as usize],
            None => 0,
        }
    }
}

pub static ZOBRIST: ZobristKeys = ZobristKeys::new();
