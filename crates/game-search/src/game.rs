//! The game abstraction searched by this crate.

use std::fmt;
use std::ops::{Deref, DerefMut};

/// Score of a position from the maximizing side's point of view.
pub type Score = i32;

/// Bound used for the initial alpha-beta window. Negates without overflow.
pub const INFINITY: Score = Score::MAX;

/// A two-player, perfect-information game state that is searched in place.
///
/// Implementors keep one mutable state and move through the tree with
/// [`apply`](Adversarial::apply) and [`undo`](Adversarial::undo). Undoing the
/// move that was just applied must restore the state exactly.
pub trait Adversarial {
    type Move: Copy + PartialEq + fmt::Debug;
    /// Whatever `apply` needs to remember so `undo` can reverse it.
    type Undo;
    type Moves: AsRef<[Self::Move]>;

    /// Legal moves for the side to move.
    fn legal_moves(&self) -> Self::Moves;

    fn apply(&mut self, mv: Self::Move) -> Self::Undo;

    fn undo(&mut self, mv: Self::Move, undo: Self::Undo);

    /// End conditions other than running out of legal moves (a completed
    /// line in tic-tac-toe, a dead draw in chess).
    fn is_over(&self) -> bool {
        false
    }

    /// A fingerprint of the full state, if the game keeps one. Debug builds
    /// compare it before and after a search.
    fn state_key(&self) -> Option<u64> {
        None
    }
}

/// Scores a position for the side the evaluator was built for.
pub trait Evaluator<G: ?Sized> {
    fn evaluate(&self, state: &G) -> Score;
}

impl<G: ?Sized, F> Evaluator<G> for F
where
    F: Fn(&G) -> Score,
{
    fn evaluate(&self, state: &G) -> Score {
        self(state)
    }
}

/// A move applied to a game, undone when the guard is dropped.
///
/// Every path out of a search node, including pruning breaks and early
/// returns, goes through `Drop`, which keeps apply and undo strictly nested.
pub struct Applied<'a, G: Adversarial> {
    game: &'a mut G,
    mv: G::Move,
    undo: Option<G::Undo>,
}

impl<'a, G: Adversarial> Applied<'a, G> {
    pub fn new(game: &'a mut G, mv: G::Move) -> Self {
        let undo = game.apply(mv);
        Applied {
            game,
            mv,
            undo: Some(undo),
        }
    }

    /// The move this guard applied.
    pub fn mv(&self) -> G::Move {
        self.mv
    }
}

impl<G: Adversarial> Deref for Applied<'_, G> {
    type Target = G;

    fn deref(&self) -> &G {
        self.game
    }
}

impl<G: Adversarial> DerefMut for Applied<'_, G> {
    fn deref_mut(&mut self) -> &mut G {
        self.game
    }
}

impl<G: Adversarial> Drop for Applied<'_, G> {
    fn drop(&mut self) {
        if let Some(undo) = self.undo.take() {
            self.game.undo(self.mv, undo);
        }
    }
}
