//! Piece geometry and attack detection on the mailbox board.

use crate::Position;
use chess_core::{PieceKind, Side, Square};

/// `(file, rank)` steps of a knight.
pub const KNIGHT_STEPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// `(file, rank)` steps of a king, also the queen's ray directions.
pub const KING_STEPS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

pub const ROOK_DIRS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

pub const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Ray directions a sliding piece moves along; empty for non-sliders.
pub const fn slider_dirs(kind: PieceKind) -> &'static [(i8, i8)] {
    match kind {
        PieceKind::Bishop => &BISHOP_DIRS,
        PieceKind::Rook => &ROOK_DIRS,
        PieceKind::Queen => &KING_STEPS,
        _ => &[],
    }
}

/// Squares along `dir` from `from` up to and including the first occupied
/// square.
pub fn ray(position: &Position, from: Square, dir: (i8, i8)) -> impl Iterator<Item = Square> + '_ {
    let mut next = from.offset(dir.0, dir.1);
    let mut blocked = false;
    std::iter::from_fn(move || {
        if blocked {
            return None;
        }
        let sq = next?;
        blocked = position.piece_at(sq).is_some();
        next = sq.offset(dir.0, dir.1);
        Some(sq)
    })
}

/// Returns true if any piece of `by` attacks `sq`.
pub fn is_square_attacked(position: &Position, sq: Square, by: Side) -> bool {
    let holds = |target: Option<Square>, kinds: &[PieceKind]| {
        target
            .and_then(|t| position.piece_at(t))
            .is_some_and(|p| p.side == by && kinds.contains(&p.kind))
    };

    // A pawn of `by` attacks diagonally forward, so look one rank behind.
    if [-1, 1]
        .into_iter()
        .any(|df| holds(sq.offset(df, -by.forward()), &[PieceKind::Pawn]))
    {
        return true;
    }

    if KNIGHT_STEPS
        .iter()
        .any(|&(df, dr)| holds(sq.offset(df, dr), &[PieceKind::Knight]))
    {
        return true;
    }

    if KING_STEPS
        .iter()
        .any(|&(df, dr)| holds(sq.offset(df, dr), &[PieceKind::King]))
    {
        return true;
    }

    let diagonal = [PieceKind::Bishop, PieceKind::Queen];
    let straight = [PieceKind::Rook, PieceKind::Queen];
    BISHOP_DIRS
        .iter()
        .any(|&dir| holds(ray(position, sq, dir).last(), &diagonal))
        || ROOK_DIRS
            .iter()
            .any(|&dir| holds(ray(position, sq, dir).last(), &straight))
}

/// Returns true if `side`'s king is attacked. A side without a king is never
/// in check.
pub fn is_king_attacked(position: &Position, side: Side) -> bool {
    position
        .king_square(side)
        .is_some_and(|king| is_square_attacked(position, king, side.opposite()))
}
