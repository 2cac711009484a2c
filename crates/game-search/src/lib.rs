//! Generic adversarial search.
//!
//! Games implement [`Adversarial`] over a single mutable state with
//! apply/undo, and the search walks the tree in place. The crate knows
//! nothing about any particular game; chess and tic-tac-toe plug in their
//! own move types and evaluators.
//!
//! ```
//! use game_search::{Ai, Policy};
//! let ai = Ai::new(Policy::Minimax { depth: 2 }, 42);
//! assert_eq!(ai.policy(), Policy::Minimax { depth: 2 });
//! ```

mod cancel;
mod game;
mod policy;
mod search;

pub use cancel::CancelToken;
pub use game::{Adversarial, Applied, Evaluator, Score, INFINITY};
pub use policy::{Ai, Policy};
pub use search::{alpha_beta, minimax, select_move, Choice, SearchContext, SearchOutcome, SearchState};
