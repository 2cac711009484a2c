//! Move-choosing policies for computer players.

use crate::cancel::CancelToken;
use crate::game::{Adversarial, Evaluator};
use crate::search::{select_move, Choice, SearchOutcome};
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// How a computer player picks its move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Uniformly random legal move.
    Random,
    /// Alpha-beta minimax to a fixed depth in plies.
    Minimax { depth: u8 },
}

/// A computer player: a policy plus the random stream it draws from.
#[derive(Debug, Clone)]
pub struct Ai {
    policy: Policy,
    rng: Xoshiro256PlusPlus,
}

impl Ai {
    /// Creates a player whose choices are fully determined by `seed`.
    pub fn new(policy: Policy, seed: u64) -> Self {
        Ai {
            policy,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: Policy) {
        self.policy = policy;
    }

    /// Picks a move for the side to move in `game`. The evaluator must score
    /// positions for that side. `game` is left as it was found.
    pub fn choose<G, E>(
        &mut self,
        game: &mut G,
        evaluator: &E,
        cancel: Option<&CancelToken>,
    ) -> SearchOutcome<G::Move>
    where
        G: Adversarial,
        E: Evaluator<G> + ?Sized,
    {
        match self.policy {
            Policy::Random => {
                if game.is_over() {
                    return SearchOutcome::Terminal;
                }
                let moves = game.legal_moves();
                match moves.as_ref().choose(&mut self.rng) {
                    Some(&mv) => SearchOutcome::Chosen(Choice {
                        mv,
                        score: None,
                        nodes: 0,
                    }),
                    None => SearchOutcome::Terminal,
                }
            }
            Policy::Minimax { depth } => {
                select_move(game, evaluator, depth, &mut self.rng, cancel)
            }
        }
    }
}
