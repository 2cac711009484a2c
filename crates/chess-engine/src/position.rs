//! Chess position representation.

use crate::zobrist::ZOBRIST;
use chess_core::{Fen, FenError, Move, MoveKind, Piece, PieceKind, Side, Square};
use std::fmt;

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    /// Builds rights from FEN order: white O-O, white O-O-O, black O-O, black O-O-O.
    pub fn from_flags(flags: [bool; 4]) -> Self {
        let bits = flags
            .iter()
            .enumerate()
            .filter(|(_, &set)| set)
            .fold(0u8, |bits, (i, _)| bits | (1 << i));
        CastlingRights(bits)
    }

    #[inline]
    const fn kingside_flag(side: Side) -> u8 {
        match side {
            Side::White => Self::WHITE_KINGSIDE,
            Side::Black => Self::BLACK_KINGSIDE,
        }
    }

    #[inline]
    const fn queenside_flag(side: Side) -> u8 {
        match side {
            Side::White => Self::WHITE_QUEENSIDE,
            Side::Black => Self::BLACK_QUEENSIDE,
        }
    }

    #[inline]
    pub const fn kingside(self, side: Side) -> bool {
        self.0 & Self::kingside_flag(side) != 0
    }

    #[inline]
    pub const fn queenside(self, side: Side) -> bool {
        self.0 & Self::queenside_flag(side) != 0
    }

    #[inline]
    pub fn remove_side(&mut self, side: Side) {
        self.0 &= !(Self::kingside_flag(side) | Self::queenside_flag(side));
    }

    #[inline]
    pub fn remove_kingside(&mut self, side: Side) {
        self.0 &= !Self::kingside_flag(side);
    }

    #[inline]
    pub fn remove_queenside(&mut self, side: Side) {
        self.0 &= !Self::queenside_flag(side);
    }

    /// Drops the right tied to a rook's home square once anything moves from
    /// or to it.
    fn touch(&mut self, sq: Square) {
        match sq {
            Square::H1 => self.remove_kingside(Side::White),
            Square::A1 => self.remove_queenside(Side::White),
            Square::H8 => self.remove_kingside(Side::Black),
            Square::A8 => self.remove_queenside(Side::Black),
            _ => {}
        }
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// State that [`Position::make_move`] overwrites and
/// [`Position::unmake_move`] needs back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undo {
    moved: Option<Piece>,
    captured: Option<Piece>,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    key: u64,
}

impl Undo {
    /// The piece the move took off the board, if any.
    pub fn captured(&self) -> Option<Piece> {
        self.captured
    }
}

/// Complete chess position state on an 8x8 mailbox.
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    board: [Option<Piece>; 64],
    side_to_move: Side,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    /// Zobrist key, kept in step with every field above.
    key: u64,
}

impl Position {
    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        const BACK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = [None; 64];
        for side in Side::BOTH {
            for (file, kind) in BACK.iter().enumerate() {
                board[side.back_rank() as usize * 8 + file] = Some(Piece::new(*kind, side));
                board[side.pawn_rank() as usize * 8 + file] =
                    Some(Piece::new(PieceKind::Pawn, side));
            }
        }

        Self::assemble(board, Side::White, CastlingRights::ALL, None, 0, 1)
    }

    /// Creates a position from a FEN string.
    ///
    /// Castling rights whose king or rook is not on its home square are
    /// dropped, and an en passant target is only kept when a pawn of the side
    /// to move could take on it.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = Fen::parse(fen)?;

        let mut castling = CastlingRights::from_flags(parsed.castling);
        for side in Side::BOTH {
            let home = |file: u8| Square::new(file, side.back_rank()).and_then(|sq| parsed.board[sq.index()]);
            let has = |file: u8, kind: PieceKind| home(file) == Some(Piece::new(kind, side));
            if !has(4, PieceKind::King) {
                castling.remove_side(side);
            }
            if !has(7, PieceKind::Rook) {
                castling.remove_kingside(side);
            }
            if !has(0, PieceKind::Rook) {
                castling.remove_queenside(side);
            }
        }

        let us = parsed.side_to_move;
        let pawn_on = |sq: Option<Square>, side: Side| {
            sq.and_then(|sq| parsed.board[sq.index()]) == Some(Piece::new(PieceKind::Pawn, side))
        };
        let en_passant = parsed.en_passant.filter(|target| {
            pawn_on(target.offset(0, -us.forward()), us.opposite())
                && [-1, 1]
                    .into_iter()
                    .any(|df| pawn_on(target.offset(df, -us.forward()), us))
        });

        Ok(Self::assemble(
            parsed.board,
            us,
            castling,
            en_passant,
            parsed.halfmove_clock,
            parsed.fullmove_number,
        ))
    }

    fn assemble(
        board: [Option<Piece>; 64],
        side_to_move: Side,
        castling: CastlingRights,
        en_passant: Option<Square>,
        halfmove_clock: u32,
        fullmove_number: u32,
    ) -> Self {
        let mut position = Position {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
            key: 0,
        };
        position.key = position.compute_key();
        position
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match Square::new(file, rank).and_then(|sq| self.piece_at(sq)) {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(self.side_to_move.to_fen_char());

        fen.push(' ');
        if self.castling == CastlingRights::NONE {
            fen.push('-');
        } else {
            for (held, c) in [
                (self.castling.kingside(Side::White), 'K'),
                (self.castling.queenside(Side::White), 'Q'),
                (self.castling.kingside(Side::Black), 'k'),
                (self.castling.queenside(Side::Black), 'q'),
            ] {
                if held {
                    fen.push(c);
                }
            }
        }

        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq.to_algebraic()),
            None => fen.push('-'),
        }

        fen.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        fen
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board[sq.index()]
    }

    /// Every occupied square with its piece, a1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    pub fn king_square(&self, side: Side) -> Option<Square> {
        let king = Piece::new(PieceKind::King, side);
        self.pieces().find(|&(_, p)| p == king).map(|(sq, _)| sq)
    }

    #[inline]
    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Zobrist key of the position.
    #[inline]
    pub fn zobrist_hash(&self) -> u64 {
        self.key
    }

    /// Recomputes the key from scratch.
    pub(crate) fn compute_key(&self) -> u64 {
        let pieces = self
            .pieces()
            .fold(0u64, |key, (sq, piece)| key ^ ZOBRIST.piece(piece, sq));
        pieces
            ^ ZOBRIST.side(self.side_to_move)
            ^ ZOBRIST.castling(self.castling)
            ^ ZOBRIST.en_passant(self.en_passant)
    }

    fn put(&mut self, sq: Square, piece: Piece) {
        debug_assert!(self.board[sq.index()].is_none(), "{} is occupied", sq);
        self.board[sq.index()] = Some(piece);
        self.key ^= ZOBRIST.piece(piece, sq);
    }

    fn take(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.board[sq.index()].take();
        if let Some(piece) = piece {
            self.key ^= ZOBRIST.piece(piece, sq);
        }
        piece
    }

    /// True if a `side` pawn stands directly left or right of `sq`. A double
    /// push only records an en passant target when one does, so repeated
    /// positions hash the same however they were reached.
    fn pawn_beside(&self, sq: Square, side: Side) -> bool {
        [-1, 1].into_iter().any(|df| {
            sq.offset(df, 0).and_then(|s| self.piece_at(s)) == Some(Piece::new(PieceKind::Pawn, side))
        })
    }

    /// Square of the pawn an en passant capture removes.
    fn en_passant_victim(mv: Move, us: Side) -> Option<Square> {
        mv.to.offset(0, -us.forward())
    }

    /// Rook squares for a castling move by `us`.
    fn castle_rook(kind: MoveKind, us: Side) -> Option<(Square, Square)> {
        let (from_file, to_file) = match kind {
            MoveKind::CastleKingside => (7, 5),
            MoveKind::CastleQueenside => (0, 3),
            _ => return None,
        };
        let rank = us.back_rank();
        Square::new(from_file, rank).zip(Square::new(to_file, rank))
    }

    /// Plays `mv` in place and returns what [`unmake_move`](Self::unmake_move)
    /// needs to take it back.
    ///
    /// `mv` must come from move generation for this position. Legality is not
    /// checked here; a move that leaves the mover's king attacked is played
    /// like any other.
    pub fn make_move(&mut self, mv: Move) -> Undo {
        let us = self.side_to_move;
        let mut undo = Undo {
            moved: None,
            captured: None,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            key: self.key,
        };

        let Some(piece) = self.take(mv.from) else {
            debug_assert!(false, "no piece on {} for {:?}", mv.from, mv);
            return undo;
        };
        undo.moved = Some(piece);

        undo.captured = match mv.kind {
            MoveKind::EnPassant => Self::en_passant_victim(mv, us).and_then(|sq| self.take(sq)),
            _ => self.take(mv.to),
        };

        let placed = match mv.promotion {
            Some(kind) => Piece::new(kind, us),
            None => piece,
        };
        self.put(mv.to, placed);

        if let Some((rook_from, rook_to)) = Self::castle_rook(mv.kind, us) {
            if let Some(rook) = self.take(rook_from) {
                self.put(rook_to, rook);
            }
        }

        self.key ^= ZOBRIST.castling(self.castling);
        if piece.kind == PieceKind::King {
            self.castling.remove_side(us);
        }
        self.castling.touch(mv.from);
        self.castling.touch(mv.to);
        self.key ^= ZOBRIST.castling(self.castling);

        self.key ^= ZOBRIST.en_passant(self.en_passant);
        self.en_passant = match mv.kind {
            MoveKind::DoublePush if self.pawn_beside(mv.to, us.opposite()) => {
                mv.from.offset(0, us.forward())
            }
            _ => None,
        };
        self.key ^= ZOBRIST.en_passant(self.en_passant);

        if piece.kind == PieceKind::Pawn || undo.captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Side::Black {
            self.fullmove_number += 1;
        }

        self.key ^= ZOBRIST.side(us) ^ ZOBRIST.side(us.opposite());
        self.side_to_move = us.opposite();

        undo
    }

    /// Takes back `mv`, which must be the last move made, restoring the
    /// position exactly.
    pub fn unmake_move(&mut self, mv: Move, undo: Undo) {
        let Some(piece) = undo.moved else {
            return;
        };
        let us = self.side_to_move.opposite();

        if let Some((rook_from, rook_to)) = Self::castle_rook(mv.kind, us) {
            self.board[rook_from.index()] = self.board[rook_to.index()].take();
        }

        self.board[mv.to.index()] = None;
        self.board[mv.from.index()] = Some(piece);

        if let Some(captured) = undo.captured {
            let sq = match mv.kind {
                MoveKind::EnPassant => Self::en_passant_victim(mv, us),
                _ => Some(mv.to),
            };
            if let Some(sq) = sq {
                self.board[sq.index()] = Some(captured);
            }
        }

        self.side_to_move = us;
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
        self.key = undo.key;
    }

    /// Total material value of `side`'s pieces, by `value`.
    pub fn material(&self, side: Side, value: impl Fn(PieceKind) -> i32) -> i32 {
        self.pieces()
            .filter(|(_, p)| p.side == side)
            .map(|(_, p)| value(p.kind))
            .sum()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.to_fen())
    }
}

/// Board diagram, rank 8 at the top.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let c = Square::new(file, rank)
                    .and_then(|sq| self.piece_at(sq))
                    .map_or('.', Piece::to_fen_char);
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn startpos_fen_roundtrip() {
        let pos = Position::startpos();
        assert_eq!(pos.to_fen(), Fen::STARTPOS);
        assert_eq!(pos, Position::from_fen(Fen::STARTPOS).unwrap());
    }

    #[test]
    fn custom_fen_roundtrip() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn piece_at_and_king_square() {
        let pos = Position::startpos();
        assert_eq!(
            pos.piece_at(Square::E1),
            Some(Piece::new(PieceKind::King, Side::White))
        );
        assert_eq!(pos.piece_at(sq("e4")), None);
        assert_eq!(pos.king_square(Side::Black), Some(Square::E8));
        assert_eq!(pos.pieces().count(), 32);
    }

    #[test]
    fn castling_rights_flags() {
        let mut rights = CastlingRights::ALL;
        rights.remove_kingside(Side::White);
        assert!(!rights.kingside(Side::White));
        assert!(rights.queenside(Side::White));

        rights.remove_side(Side::Black);
        assert!(!rights.kingside(Side::Black));
        assert!(!rights.queenside(Side::Black));

        assert_eq!(
            CastlingRights::from_flags([true, false, false, true]).raw(),
            CastlingRights::WHITE_KINGSIDE | CastlingRights::BLACK_QUEENSIDE
        );
    }

    #[test]
    fn fen_drops_impossible_castling_rights() {
        let pos = Position::from_fen("r3k3/8/8/8/8/8/8/4K2R w KQkq - 0 1").unwrap();
        assert!(pos.castling().kingside(Side::White));
        assert!(!pos.castling().queenside(Side::White));
        assert!(!pos.castling().kingside(Side::Black));
        assert!(pos.castling().queenside(Side::Black));
    }

    #[test]
    fn fen_keeps_capturable_en_passant_only() {
        let kept = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        assert_eq!(kept.en_passant(), Some(sq("d6")));

        let dropped = Position::from_fen("4k3/8/8/3p4/8/8/8/4K3 w - d6 0 2").unwrap();
        assert_eq!(dropped.en_passant(), None);
    }

    #[test]
    fn make_double_push() {
        let mut pos = Position::startpos();
        pos.make_move(Move::new(sq("e2"), sq("e4"), MoveKind::DoublePush));
        assert_eq!(pos.side_to_move(), Side::Black);
        assert_eq!(pos.en_passant(), None);
        assert_eq!(pos.piece_at(sq("e2")), None);
        assert_eq!(pos.zobrist_hash(), pos.compute_key());
    }

    #[test]
    fn double_push_next_to_enemy_pawn_sets_target() {
        let mut pos = Position::from_fen("4k3/8/8/8/3p4/8/4P3/4K3 w - - 0 1").unwrap();
        pos.make_move(Move::new(sq("e2"), sq("e4"), MoveKind::DoublePush));
        assert_eq!(pos.en_passant(), Some(sq("e3")));
        assert_eq!(pos.to_fen(), "4k3/8/8/8/3pP3/8/8/4K3 b - e3 0 1");
        assert_eq!(pos.zobrist_hash(), pos.compute_key());
    }

    #[test]
    fn make_and_unmake_castle() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10";
        let mut pos = Position::from_fen(fen).unwrap();
        let before = pos.clone();
        let castle = Move::new(Square::E1, Square::G1, MoveKind::CastleKingside);

        let undo = pos.make_move(castle);
        assert_eq!(
            pos.piece_at(Square::F1),
            Some(Piece::new(PieceKind::Rook, Side::White))
        );
        assert_eq!(pos.piece_at(Square::H1), None);
        assert!(!pos.castling().kingside(Side::White));
        assert!(pos.castling().queenside(Side::Black));
        assert_eq!(pos.halfmove_clock(), 4);
        assert_eq!(pos.zobrist_hash(), pos.compute_key());

        pos.unmake_move(castle, undo);
        assert_eq!(pos, before);
    }

    #[test]
    fn make_and_unmake_en_passant() {
        let fen = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2";
        let mut pos = Position::from_fen(fen).unwrap();
        let ep = Move::new(sq("e5"), sq("d6"), MoveKind::EnPassant);

        let undo = pos.make_move(ep);
        assert_eq!(pos.piece_at(sq("d5")), None);
        assert_eq!(
            undo.captured(),
            Some(Piece::new(PieceKind::Pawn, Side::Black))
        );
        assert_eq!(pos.zobrist_hash(), pos.compute_key());

        pos.unmake_move(ep, undo);
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn make_and_unmake_promotion_capture() {
        let fen = "1r2k3/P7/8/8/8/8/8/4K3 w - - 5 40";
        let mut pos = Position::from_fen(fen).unwrap();
        let before = pos.clone();
        let promo = Move::promote(sq("a7"), sq("b8"), PieceKind::Knight, true);

        let undo = pos.make_move(promo);
        assert_eq!(
            pos.piece_at(sq("b8")),
            Some(Piece::new(PieceKind::Knight, Side::White))
        );
        assert_eq!(pos.halfmove_clock(), 0);

        pos.unmake_move(promo, undo);
        assert_eq!(pos, before);
    }

    #[test]
    fn rook_capture_removes_castling_right() {
        let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        pos.make_move(Move::new(Square::A1, Square::A8, MoveKind::Capture));
        assert!(!pos.castling().queenside(Side::White));
        assert!(!pos.castling().queenside(Side::Black));
        assert!(pos.castling().kingside(Side::Black));
        assert_eq!(pos.zobrist_hash(), pos.compute_key());
    }

    #[test]
    fn material_sum() {
        let pos = Position::startpos();
        assert_eq!(pos.material(Side::White, |_| 1), 16);
    }

    #[test]
    fn display_diagram() {
        let text = Position::startpos().to_string();
        assert!(text.starts_with("8  r n b q k b n r"));
        assert!(text.ends_with("a b c d e f g h"));
    }
}
