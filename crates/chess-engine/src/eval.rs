//! Static evaluation and the search hookup.

use crate::movegen::{generate_moves, MoveList};
use crate::position::Undo;
use crate::rules::{is_insufficient_material, RuleSet};
use crate::Position;
use chess_core::{Move, PieceKind, Side};
use game_search::{Adversarial, Evaluator, Score};

/// Material value of a piece kind.
pub const fn piece_value(kind: PieceKind) -> Score {
    match kind {
        PieceKind::Pawn => 10,
        PieceKind::Knight => 30,
        PieceKind::Bishop => 30,
        PieceKind::Rook => 50,
        PieceKind::Queen => 90,
        PieceKind::King => 900,
    }
}

/// Material balance from one side's point of view: its own pieces count
/// positive, the opponent's negative.
///
/// Nothing but material is scored, mate and stalemate included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Material {
    pub side: Side,
}

impl Material {
    pub const fn new(side: Side) -> Self {
        Material { side }
    }
}

impl Evaluator<Position> for Material {
    fn evaluate(&self, position: &Position) -> Score {
        position.material(self.side, piece_value)
            - position.material(self.side.opposite(), piece_value)
    }
}

impl Adversarial for Position {
    type Move = Move;
    type Undo = Undo;
    type Moves = MoveList;

    fn legal_moves(&self) -> MoveList {
        generate_moves(self)
    }

    fn apply(&mut self, mv: Move) -> Undo {
        self.make_move(mv)
    }

    fn undo(&mut self, mv: Move, undo: Undo) {
        self.unmake_move(mv, undo)
    }

    /// Dead draws and the fifty-move mark end a line early. Repetition needs
    /// game history and is left to [`Game`](crate::Game).
    fn is_over(&self) -> bool {
        self.halfmove_clock() >= 100 || is_insufficient_material(self)
    }

    fn state_key(&self) -> Option<u64> {
        Some(self.zobrist_hash())
    }
}

/// A position searched under a [`RuleSet`]. Legal moves come from the
/// rules and are played through them, so the computer only picks moves the
/// game will accept.
pub struct RuledPosition<'a> {
    rules: &'a dyn RuleSet,
    position: &'a mut Position,
}

impl<'a> RuledPosition<'a> {
    pub fn new(rules: &'a dyn RuleSet, position: &'a mut Position) -> Self {
        RuledPosition { rules, position }
    }

    pub fn position(&self) -> &Position {
        &*self.position
    }
}

impl Evaluator<RuledPosition<'_>> for Material {
    fn evaluate(&self, state: &RuledPosition<'_>) -> Score {
        <Self as Evaluator<Position>>::evaluate(self, state.position())
    }
}

impl Adversarial for RuledPosition<'_> {
    type Move = Move;
    type Undo = Undo;
    type Moves = MoveList;

    fn legal_moves(&self) -> MoveList {
        self.rules.generate_moves(self.position())
    }

    fn apply(&mut self, mv: Move) -> Undo {
        self.rules.make_move(self.position, mv)
    }

    fn undo(&mut self, mv: Move, undo: Undo) {
        self.rules.unmake_move(self.position, mv, undo)
    }

    fn is_over(&self) -> bool {
        self.position.halfmove_clock() >= 100
            || self.rules.is_insufficient_material(self.position())
    }

    fn state_key(&self) -> Option<u64> {
        Some(self.position.zobrist_hash())
    }
}
