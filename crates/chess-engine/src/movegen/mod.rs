//! Legal move generation.
//!
//! Moves are generated pseudo-legally by walking offsets and rays on the
//! mailbox, then filtered by playing each one on a scratch copy and checking
//! whether the mover's king is left attacked.

mod attacks;
pub mod perft;

use crate::Position;
use chess_core::{Move, MoveKind, Piece, PieceKind, Side, Square};

pub use attacks::{is_king_attacked, is_square_attacked, ray, slider_dirs, KING_STEPS, KNIGHT_STEPS};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so a fixed-size array avoids
/// heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of legal moves in any chess position.
    pub const MAX_MOVES: usize = 256;

    const FILLER: Move = Move::new(Square::A1, Square::A1, MoveKind::Quiet);

    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Self::FILLER; Self::MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<[Move]> for MoveList {
    fn as_ref(&self) -> &[Move] {
        self.as_slice()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Generates all legal moves for the side to move.
pub fn generate_moves(position: &Position) -> MoveList {
    let mut moves = MoveList::new();
    let us = position.side_to_move();
    for (from, piece) in position.pieces().filter(|(_, p)| p.side == us) {
        generate_piece_moves(position, from, piece, &mut moves);
    }
    retain_legal(position, &mut moves);
    moves
}

/// Legal moves of the piece on `from`. Empty when the square is empty or
/// holds a piece of the side not to move.
pub fn legal_moves_from(position: &Position, from: Square) -> MoveList {
    let mut moves = MoveList::new();
    if let Some(piece) = position
        .piece_at(from)
        .filter(|p| p.side == position.side_to_move())
    {
        generate_piece_moves(position, from, piece, &mut moves);
        retain_legal(position, &mut moves);
    }
    moves
}

fn retain_legal(position: &Position, moves: &mut MoveList) {
    let us = position.side_to_move();
    let mut scratch = position.clone();
    moves.retain(|&m| {
        let undo = scratch.make_move(m);
        let legal = !is_king_attacked(&scratch, us);
        scratch.unmake_move(m, undo);
        legal
    });
    debug_assert!(scratch == *position, "legality check left the board changed");
}

fn generate_piece_moves(position: &Position, from: Square, piece: Piece, moves: &mut MoveList) {
    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(position, from, piece.side, moves),
        PieceKind::Knight => generate_steps(position, from, piece.side, &KNIGHT_STEPS, moves),
        PieceKind::King => {
            generate_steps(position, from, piece.side, &KING_STEPS, moves);
            generate_castling_moves(position, from, piece.side, moves);
        }
        kind => {
            for &dir in slider_dirs(kind) {
                for to in ray(position, from, dir) {
                    push_to(position, from, to, piece.side, moves);
                }
            }
        }
    }
}

/// Adds a quiet move or capture onto `to` unless a friendly piece is there.
fn push_to(position: &Position, from: Square, to: Square, us: Side, moves: &mut MoveList) {
    match position.piece_at(to) {
        None => moves.push(Move::new(from, to, MoveKind::Quiet)),
        Some(p) if p.side != us => moves.push(Move::new(from, to, MoveKind::Capture)),
        Some(_) => {}
    }
}

fn generate_steps(
    position: &Position,
    from: Square,
    us: Side,
    steps: &[(i8, i8)],
    moves: &mut MoveList,
) {
    for &(df, dr) in steps {
        if let Some(to) = from.offset(df, dr) {
            push_to(position, from, to, us, moves);
        }
    }
}

fn push_pawn_move(from: Square, to: Square, us: Side, capture: bool, moves: &mut MoveList) {
    if to.rank() == us.promotion_rank() {
        for piece in PieceKind::PROMOTIONS {
            moves.push(Move::promote(from, to, piece, capture));
        }
    } else {
        let kind = if capture {
            MoveKind::Capture
        } else {
            MoveKind::Quiet
        };
        moves.push(Move::new(from, to, kind));
    }
}

fn generate_pawn_moves(position: &Position, from: Square, us: Side, moves: &mut MoveList) {
    let forward = us.forward();

    if let Some(one) = from.offset(0, forward).filter(|&sq| position.piece_at(sq).is_none()) {
        push_pawn_move(from, one, us, false, moves);

        if from.rank() == us.pawn_rank() {
            if let Some(two) = one
                .offset(0, forward)
                .filter(|&sq| position.piece_at(sq).is_none())
            {
                moves.push(Move::new(from, two, MoveKind::DoublePush));
            }
        }
    }

    for df in [-1, 1] {
        let Some(to) = from.offset(df, forward) else {
            continue;
        };
        match position.piece_at(to) {
            Some(p) if p.side != us => push_pawn_move(from, to, us, true, moves),
            None if position.en_passant() == Some(to) => {
                moves.push(Move::new(from, to, MoveKind::EnPassant));
            }
            _ => {}
        }
    }
}

/// Castling: rights held, squares between king and rook empty, and the king
/// neither starts on, passes through, nor lands on an attacked square.
fn generate_castling_moves(position: &Position, from: Square, us: Side, moves: &mut MoveList) {
    let rank = us.back_rank();
    if Square::new(4, rank) != Some(from) {
        return;
    }
    let them = us.opposite();
    let rights = position.castling();

    let sides = [
        (rights.kingside(us), MoveKind::CastleKingside, &[5u8, 6][..], [5u8, 6]),
        (rights.queenside(us), MoveKind::CastleQueenside, &[1u8, 2, 3][..], [3u8, 2]),
    ];

    for (held, kind, between, king_path) in sides {
        if !held {
            continue;
        }
        let clear = between
            .iter()
            .all(|&file| Square::new(file, rank).is_some_and(|sq| position.piece_at(sq).is_none()));
        if !clear || is_square_attacked(position, from, them) {
            continue;
        }
        let safe = king_path
            .iter()
            .all(|&file| Square::new(file, rank).is_some_and(|sq| !is_square_attacked(position, sq, them)));
        if let (true, Some(to)) = (safe, Square::new(king_path[1], rank)) {
            moves.push(Move::new(from, to, kind));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn count(position: &Position, pred: impl Fn(&Move) -> bool) -> usize {
        generate_moves(position).as_slice().iter().filter(|m| pred(m)).count()
    }

    #[test]
    fn movelist_push_and_retain() {
        let mut list = MoveList::new();
        assert!(list.is_empty());

        let m1 = Move::new(sq("e2"), sq("e3"), MoveKind::Quiet);
        let m2 = Move::new(sq("e2"), sq("e4"), MoveKind::DoublePush);
        let m3 = Move::new(sq("d2"), sq("d3"), MoveKind::Quiet);
        list.push(m1);
        list.push(m2);
        list.push(m3);
        assert_eq!(list.len(), 3);
        assert_eq!(list[1], m2);

        list.retain(|m| m.from == sq("e2"));
        assert_eq!(list.as_slice(), &[m1, m2]);
    }

    #[test]
    fn startpos_has_twenty_moves() {
        let position = Position::startpos();
        let moves = generate_moves(&position);
        assert_eq!(moves.len(), 20);
        assert_eq!(count(&position, |m| m.kind == MoveKind::DoublePush), 8);
    }

    #[test]
    fn moves_from_one_square() {
        let position = Position::startpos();
        let knight = legal_moves_from(&position, Square::G1);
        let targets: Vec<_> = knight.as_slice().iter().map(|m| m.to).collect();
        assert_eq!(knight.len(), 2);
        assert!(targets.contains(&sq("f3")));
        assert!(targets.contains(&sq("h3")));

        assert!(legal_moves_from(&position, sq("e4")).is_empty());
        assert!(legal_moves_from(&position, sq("e7")).is_empty());
        assert!(legal_moves_from(&position, Square::A1).is_empty());
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        let position = Position::from_fen("4r1k1/8/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
        assert!(legal_moves_from(&position, sq("e2")).is_empty());
    }

    #[test]
    fn castling_both_ways() {
        let position =
            Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(count(&position, |m| m.kind == MoveKind::CastleKingside), 1);
        assert_eq!(count(&position, |m| m.kind == MoveKind::CastleQueenside), 1);
    }

    #[test]
    fn no_castling_out_of_or_through_check() {
        let in_check =
            Position::from_fen("r3k2r/pppp1ppp/8/4r3/8/8/PPPP1PPP/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(count(&in_check, |m| m.kind.is_castle()), 0);

        let through = Position::from_fen("4k3/8/8/8/8/8/5r2/R3K2R w KQ - 0 1").unwrap();
        assert_eq!(count(&through, |m| m.kind == MoveKind::CastleKingside), 0);

        // b1 may be attacked; only the king's path matters.
        let b_file = Position::from_fen("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        assert_eq!(count(&b_file, |m| m.kind == MoveKind::CastleQueenside), 1);
    }

    #[test]
    fn no_castling_when_blocked() {
        let position = Position::from_fen("4k3/8/8/8/8/8/8/RN2K1NR w KQ - 0 1").unwrap();
        assert_eq!(count(&position, |m| m.kind.is_castle()), 0);
    }

    #[test]
    fn en_passant_generated() {
        let position =
            Position::from_fen("rnbqkbnr/pppp1ppp/8/4pP2/8/8/PPPPP1PP/RNBQKBNR w KQkq e6 0 1")
                .unwrap();
        assert_eq!(count(&position, |m| m.kind == MoveKind::EnPassant), 1);
    }

    #[test]
    fn en_passant_exposing_king_is_illegal() {
        let position = Position::from_fen("8/8/8/K2pP2r/8/8/8/4k3 w - d6 0 1").unwrap();
        assert_eq!(count(&position, |m| m.kind == MoveKind::EnPassant), 0);
    }

    #[test]
    fn all_four_promotions() {
        let position = Position::from_fen("8/P7/8/8/8/8/8/4K2k w - - 0 1").unwrap();
        let promos: Vec<_> = generate_moves(&position)
            .as_slice()
            .iter()
            .filter_map(|m| m.promotion)
            .collect();
        assert_eq!(promos, PieceKind::PROMOTIONS.to_vec());
    }

    #[test]
    fn generated_moves_never_leave_king_attacked() {
        let position = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        for &m in &generate_moves(&position) {
            let mut next = position.clone();
            next.make_move(m);
            assert!(!is_king_attacked(&next, Side::White), "{:?}", m);
        }
    }
}
