//! Computer play: the search hookup and difficulty tiers.

use crate::board::{Board, Mark};
use game_search::{Adversarial, Evaluator, Policy, Score};
use serde::{Deserialize, Serialize};
use thiserror::Error;

impl Adversarial for Board {
    type Move = usize;
    type Undo = ();
    type Moves = Vec<usize>;

    fn legal_moves(&self) -> Vec<usize> {
        if self.winner().is_some() {
            return Vec::new();
        }
        self.empty_cells().collect()
    }

    fn apply(&mut self, cell: usize) {
        self.set(cell);
    }

    fn undo(&mut self, cell: usize, _: ()) {
        self.clear(cell);
    }

    fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    fn state_key(&self) -> Option<u64> {
        let cells = self.cells().iter().fold(0u64, |key, cell| {
            key * 3
                + match cell {
                    None => 0,
                    Some(Mark::X) => 1,
                    Some(Mark::O) => 2,
                }
        });
        Some(cells * 2 + (self.to_move() == Mark::O) as u64)
    }
}

/// Scores finished boards for one mark: a win is worth `10 - marks`, a loss
/// `marks - 10`, so quicker wins and slower losses rank higher. Anything
/// else is 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineScore {
    pub mark: Mark,
}

impl Evaluator<Board> for LineScore {
    fn evaluate(&self, board: &Board) -> Score {
        let marks = board.marks() as Score;
        match board.winner() {
            Some((mark, _)) if mark == self.mark => 10 - marks,
            Some(_) => marks - 10,
            None => 0,
        }
    }
}

/// How hard the computer plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// A uniformly random empty cell.
    #[default]
    Easy,
    /// Full-depth minimax; never loses.
    Hard,
}

impl Difficulty {
    pub const fn policy(self) -> Policy {
        match self {
            Difficulty::Easy => Policy::Random,
            Difficulty::Hard => Policy::Minimax { depth: 9 },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty '{0}', expected easy or hard")]
pub struct ParseDifficultyError(String);

impl std::str::FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_search::{alpha_beta, minimax, Ai, SearchContext, SearchOutcome, SearchState};
    use proptest::prelude::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    fn hard_move(b: &mut Board, seed: u64) -> Option<usize> {
        let eval = LineScore { mark: b.to_move() };
        Ai::new(Difficulty::Hard.policy(), seed).choose(b, &eval, None).mv()
    }

    #[test]
    fn takes_the_win() {
        let mut b = board("XX-/OO-/---");
        assert_eq!(hard_move(&mut b, 0), Some(2));
    }

    #[test]
    fn blocks_the_loss() {
        let mut b = board("OO-/X--/--X");
        assert_eq!(b.to_move(), Mark::X);
        assert_eq!(hard_move(&mut b, 3), Some(2));
    }

    #[test]
    fn finished_board_is_terminal() {
        let mut b = board("XXX/OO-/---");
        let mut ai = Ai::new(Policy::Random, 1);
        assert_eq!(
            ai.choose(&mut b, &LineScore { mark: Mark::O }, None),
            SearchOutcome::Terminal
        );
        let mut full = board("XOX/XOO/OXX");
        assert_eq!(hard_move(&mut full, 1), None);
    }

    #[test]
    fn scores_prefer_fast_wins() {
        let eval = LineScore { mark: Mark::X };
        assert_eq!(eval.evaluate(&board("XXX/OO-/---")), 5);
        assert_eq!(eval.evaluate(&board("OOO/XX-/X--")), -4);
        assert_eq!(eval.evaluate(&board("XOX/XOO/OXX")), 0);
    }

    #[test]
    fn empty_board_is_a_draw_with_best_play() {
        let mut b = Board::new();
        let value = minimax(&mut b, &LineScore { mark: Mark::X }, 9, true);
        assert_eq!(value, 0);
        assert_eq!(b, Board::new());
    }

    #[test]
    fn difficulty_parsing() {
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" easy ".parse::<Difficulty>(), Ok(Difficulty::Easy));
        let err = "medium".parse::<Difficulty>().unwrap_err();
        assert_eq!(err.to_string(), "unknown difficulty 'medium', expected easy or hard");
        assert_eq!(Difficulty::default(), Difficulty::Easy);
    }

    /// Boards reachable by legal play, as move sequences.
    fn arb_board() -> impl Strategy<Value = Board> {
        prop::collection::vec(any::<prop::sample::Index>(), 0..7).prop_map(|picks| {
            let mut b = Board::new();
            for pick in picks {
                let moves = b.legal_moves();
                if moves.is_empty() {
                    break;
                }
                b.apply(moves[pick.index(moves.len())]);
            }
            b
        })
    }

    proptest! {
        #[test]
        fn pruning_agrees_with_minimax(mut b in arb_board()) {
            let eval = LineScore { mark: b.to_move() };
            let mut ctx = SearchContext::new(None);
            let pruned = alpha_beta(&mut b, &eval, SearchState::new(9, true), &mut ctx);
            let before = b;
            let full = minimax(&mut b, &eval, 9, true);
            prop_assert_eq!(pruned, full);
            prop_assert_eq!(b, before);
        }

        #[test]
        fn hard_never_loses_to_random(seed in any::<u64>(), hard_is_x in any::<bool>()) {
            let mut b = Board::new();
            let mut random = Ai::new(Policy::Random, seed);
            let mut hard = Ai::new(Difficulty::Hard.policy(), seed ^ 0x5555);
            let hard_mark = if hard_is_x { Mark::X } else { Mark::O };

            while !b.legal_moves().is_empty() {
                let eval = LineScore { mark: b.to_move() };
                let ai = if b.to_move() == hard_mark { &mut hard } else { &mut random };
                let cell = ai.choose(&mut b, &eval, None).mv().unwrap();
                b.place(cell).unwrap();
            }
            prop_assert_ne!(b.winner().map(|(m, _)| m), Some(hard_mark.opposite()));
        }
    }
}
