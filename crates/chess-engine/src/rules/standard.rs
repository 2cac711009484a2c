//! Standard chess rules.

use super::{DrawReason, GameResult, RuleSet};
use crate::movegen::{generate_moves, is_king_attacked, legal_moves_from};
use crate::{MoveList, Position};
use chess_core::{PieceKind, Side, Square};

/// Standard FIDE rules: castling, en passant, promotion to any of four
/// pieces, check, checkmate and stalemate, plus the automatic draws.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardChess;

impl RuleSet for StandardChess {
    fn initial_position(&self) -> Position {
        Position::startpos()
    }

    fn generate_moves(&self, position: &Position) -> MoveList {
        generate_moves(position)
    }

    fn moves_from(&self, position: &Position, from: Square) -> MoveList {
        legal_moves_from(position, from)
    }

    fn is_check(&self, position: &Position) -> bool {
        is_king_attacked(position, position.side_to_move())
    }

    fn game_result(&self, position: &Position) -> Option<GameResult> {
        if generate_moves(position).is_empty() {
            return Some(if self.is_check(position) {
                GameResult::loss_for(position.side_to_move())
            } else {
                GameResult::Draw(DrawReason::Stalemate)
            });
        }
        if position.halfmove_clock() >= 150 {
            return Some(GameResult::Draw(DrawReason::SeventyFiveMoveRule));
        }
        if is_insufficient_material(position) {
            return Some(GameResult::Draw(DrawReason::InsufficientMaterial));
        }
        None
    }

    fn is_insufficient_material(&self, position: &Position) -> bool {
        is_insufficient_material(position)
    }
}

/// True when no sequence of legal moves can mate: bare kings, a single minor
/// piece, or only bishops that all stand on one square color.
pub fn is_insufficient_material(position: &Position) -> bool {
    let mut minors = [0usize; 2];
    let mut bishop_colors = [false; 2];
    let mut knights = 0;

    for (sq, piece) in position.pieces() {
        match piece.kind {
            PieceKind::King => {}
            PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
            PieceKind::Knight => {
                knights += 1;
                minors[piece.side.index()] += 1;
            }
            PieceKind::Bishop => {
                bishop_colors[((sq.file() + sq.rank()) % 2) as usize] = true;
                minors[piece.side.index()] += 1;
            }
        }
    }

    let total = minors[Side::White.index()] + minors[Side::Black.index()];
    if total <= 1 {
        return true;
    }
    knights == 0 && !(bishop_colors[0] && bishop_colors[1])
}
