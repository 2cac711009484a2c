//! Minimax search with alpha-beta pruning.

use crate::cancel::CancelToken;
use crate::game::{Adversarial, Applied, Evaluator, Score, INFINITY};
use rand::seq::SliceRandom;
use rand::Rng;

/// Per-node search parameters. Lives for one call and is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchState {
    /// Remaining plies.
    pub depth: u8,
    pub alpha: Score,
    pub beta: Score,
    /// True when the side to move at this node is the evaluator's side.
    pub maximizing: bool,
}

impl SearchState {
    /// A full-window state.
    pub const fn new(depth: u8, maximizing: bool) -> Self {
        SearchState {
            depth,
            alpha: -INFINITY,
            beta: INFINITY,
            maximizing,
        }
    }

    /// The state handed to a child node.
    #[inline]
    const fn child(self) -> Self {
        SearchState {
            depth: self.depth - 1,
            alpha: self.alpha,
            beta: self.beta,
            maximizing: !self.maximizing,
        }
    }
}

/// Bookkeeping shared by every node of one search.
#[derive(Debug)]
pub struct SearchContext<'a> {
    nodes: u64,
    cancel: Option<&'a CancelToken>,
    stopped: bool,
}

impl<'a> SearchContext<'a> {
    pub fn new(cancel: Option<&'a CancelToken>) -> Self {
        SearchContext {
            nodes: 0,
            cancel,
            stopped: false,
        }
    }

    /// Nodes visited so far.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// True once cancellation has been observed.
    pub fn stopped(&self) -> bool {
        self.stopped
    }

    fn should_stop(&mut self) -> bool {
        if !self.stopped && self.cancel.is_some_and(CancelToken::is_cancelled) {
            self.stopped = true;
        }
        self.stopped
    }
}

/// Alpha-beta minimax.
///
/// Returns the value of `game` for the evaluator's side, searched `state.depth`
/// plies deep. Depth 0, a finished game, or a position with no legal moves is
/// scored by the evaluator directly. The game is back in its original state
/// when this returns, whether or not the search was pruned or cancelled. A
/// cancelled search returns a meaningless score; check
/// [`SearchContext::stopped`].
pub fn alpha_beta<G, E>(
    game: &mut G,
    evaluator: &E,
    state: SearchState,
    ctx: &mut SearchContext<'_>,
) -> Score
where
    G: Adversarial,
    E: Evaluator<G> + ?Sized,
{
    ctx.nodes += 1;

    if state.depth == 0 || game.is_over() {
        return evaluator.evaluate(game);
    }
    let moves = game.legal_moves();
    if moves.as_ref().is_empty() {
        return evaluator.evaluate(game);
    }

    let mut state = state;
    let mut best = if state.maximizing { -INFINITY } else { INFINITY };

    for &mv in moves.as_ref() {
        if ctx.should_stop() {
            break;
        }

        let score = {
            let mut child = Applied::new(game, mv);
            alpha_beta(&mut *child, evaluator, state.child(), ctx)
        };

        if state.maximizing {
            best = best.max(score);
            state.alpha = state.alpha.max(score);
        } else {
            best = best.min(score);
            state.beta = state.beta.min(score);
        }
        if state.beta <= state.alpha {
            break;
        }
    }

    best
}

/// Plain minimax without pruning. Same contract as [`alpha_beta`]; exists as
/// the reference the pruned search is checked against.
pub fn minimax<G, E>(game: &mut G, evaluator: &E, depth: u8, maximizing: bool) -> Score
where
    G: Adversarial,
    E: Evaluator<G> + ?Sized,
{
    if depth == 0 || game.is_over() {
        return evaluator.evaluate(game);
    }
    let moves = game.legal_moves();
    if moves.as_ref().is_empty() {
        return evaluator.evaluate(game);
    }

    let mut best = if maximizing { -INFINITY } else { INFINITY };
    for &mv in moves.as_ref() {
        let mut child = Applied::new(game, mv);
        let score = minimax(&mut *child, evaluator, depth - 1, !maximizing);
        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }
    best
}

/// A move picked by [`select_move`] or a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice<M> {
    pub mv: M,
    /// Search value of the move; `None` when the move was not searched.
    pub score: Option<Score>,
    /// Nodes visited while choosing.
    pub nodes: u64,
}

/// What a move selection produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome<M> {
    Chosen(Choice<M>),
    /// The side to move has no legal moves or the game is already over.
    Terminal,
    /// The cancel token fired before every root move was searched.
    Cancelled,
}

impl<M: Copy> SearchOutcome<M> {
    /// The chosen move, if any.
    pub fn mv(&self) -> Option<M> {
        match self {
            SearchOutcome::Chosen(choice) => Some(choice.mv),
            _ => None,
        }
    }
}

/// Picks the best move for the side to move, which must be the evaluator's
/// side.
///
/// Root moves are shuffled with `rng` first, then each one is applied and
/// searched `depth - 1` plies from the opponent's perspective with a full
/// window. The first move with the strictly highest score wins, so ties are
/// broken by the shuffle.
pub fn select_move<G, E, R>(
    game: &mut G,
    evaluator: &E,
    depth: u8,
    rng: &mut R,
    cancel: Option<&CancelToken>,
) -> SearchOutcome<G::Move>
where
    G: Adversarial,
    E: Evaluator<G> + ?Sized,
    R: Rng + ?Sized,
{
    if game.is_over() {
        return SearchOutcome::Terminal;
    }
    let mut moves = game.legal_moves().as_ref().to_vec();
    if moves.is_empty() {
        return SearchOutcome::Terminal;
    }
    moves.shuffle(rng);

    let key_before = game.state_key();
    let mut ctx = SearchContext::new(cancel);
    let child_state = SearchState::new(depth.max(1) - 1, false);
    let mut best: Option<(G::Move, Score)> = None;

    for mv in moves {
        if ctx.should_stop() {
            break;
        }
        let score = {
            let mut child = Applied::new(game, mv);
            alpha_beta(&mut *child, evaluator, child_state, &mut ctx)
        };
        if ctx.stopped() {
            break;
        }
        if best.is_none_or(|(_, value)| score > value) {
            best = Some((mv, score));
        }
    }

    debug_assert_eq!(
        game.state_key(),
        key_before,
        "search left the position modified"
    );

    if ctx.stopped() {
        tracing::debug!(nodes = ctx.nodes(), "search cancelled");
        return SearchOutcome::Cancelled;
    }

    match best {
        Some((mv, score)) => {
            tracing::debug!(?mv, score, depth, nodes = ctx.nodes(), "search complete");
            SearchOutcome::Chosen(Choice {
                mv,
                score: Some(score),
                nodes: ctx.nodes(),
            })
        }
        None => SearchOutcome::Terminal,
    }
}
