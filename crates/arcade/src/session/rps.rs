use super::{MoveOutcome, Phase};
use crate::error::ArcadeError;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Rounds in a match.
pub const ROUNDS: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    Rock,
    Paper,
    Scissors,
}

impl Hand {
    pub const ALL: [Hand; 3] = [Hand::Rock, Hand::Paper, Hand::Scissors];

    pub const fn beats(self, other: Hand) -> bool {
        matches!(
            (self, other),
            (Hand::Rock, Hand::Scissors) | (Hand::Paper, Hand::Rock) | (Hand::Scissors, Hand::Paper)
        )
    }
}

impl FromStr for Hand {
    type Err = ArcadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rock" | "r" => Ok(Hand::Rock),
            "paper" | "p" => Ok(Hand::Paper),
            "scissors" | "s" => Ok(Hand::Scissors),
            other => Err(ArcadeError::invalid(format!(
                "'{}' is not a hand, choose rock, paper or scissors",
                other
            ))),
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Hand::Rock => "rock",
            Hand::Paper => "paper",
            Hand::Scissors => "scissors",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Win,
    Loss,
    Tie,
}

impl Verdict {
    fn from_score(score: i32) -> Self {
        match score.cmp(&0) {
            Ordering::Greater => Verdict::Win,
            Ordering::Less => Verdict::Loss,
            Ordering::Equal => Verdict::Tie,
        }
    }

    const fn points(self) -> i32 {
        match self {
            Verdict::Win => 1,
            Verdict::Loss => -1,
            Verdict::Tie => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Round {
    pub player: Hand,
    pub computer: Hand,
    pub verdict: Verdict,
}

/// How a finished match went, by the sign of its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub verdict: Verdict,
    pub score: i32,
}

/// Five rounds against a uniformly random computer. The match restarts by
/// itself after the last round.
pub struct RpsSession {
    score: i32,
    /// Rounds played in the current match.
    played: u8,
    last_round: Option<Round>,
    last_match: Option<MatchSummary>,
    rng: Xoshiro256PlusPlus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RpsSnapshot {
    pub score: i32,
    /// The round about to be played, 1-based.
    pub round: u8,
    pub rounds: u8,
    pub last_round: Option<Round>,
    pub last_match: Option<MatchSummary>,
    pub phase: Phase,
    pub status: String,
}

impl RpsSession {
    pub fn new(seed: u64) -> Self {
        RpsSession {
            score: 0,
            played: 0,
            last_round: None,
            last_match: None,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn last_match(&self) -> Option<MatchSummary> {
        self.last_match
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.played = 0;
        self.last_round = None;
        self.last_match = None;
    }

    pub fn throw(&mut self, hand: &str) -> Result<MoveOutcome, ArcadeError> {
        let player: Hand = hand.parse()?;
        let computer = Hand::ALL[self.rng.random_range(0..Hand::ALL.len())];
        Ok(self.play_round(player, computer))
    }

    fn play_round(&mut self, player: Hand, computer: Hand) -> MoveOutcome {
        let verdict = if player == computer {
            Verdict::Tie
        } else if player.beats(computer) {
            Verdict::Win
        } else {
            Verdict::Loss
        };
        self.score += verdict.points();
        self.played += 1;
        self.last_round = Some(Round {
            player,
            computer,
            verdict,
        });
        if self.last_match.is_some() && self.played == 1 {
            self.last_match = None;
        }

        if self.played == ROUNDS {
            let summary = MatchSummary {
                verdict: Verdict::from_score(self.score),
                score: self.score,
            };
            tracing::info!(verdict = ?summary.verdict, score = summary.score, "rock paper scissors match over");
            self.last_match = Some(summary);
            self.score = 0;
            self.played = 0;
        }
        MoveOutcome::Applied
    }

    pub fn status(&self) -> String {
        if let (Some(summary), 0) = (self.last_match, self.played) {
            let message = match summary.verdict {
                Verdict::Win => "You won the game!",
                Verdict::Loss => "Computer won the game!",
                Verdict::Tie => "It's a tie game!",
            };
            return format!("Game Over! {} Final score: {}", message, summary.score);
        }
        match self.last_round.map(|r| r.verdict) {
            None => "Choose rock, paper, or scissors".to_string(),
            Some(Verdict::Win) => "You win this round!".to_string(),
            Some(Verdict::Loss) => "Computer wins this round!".to_string(),
            Some(Verdict::Tie) => "It's a tie!".to_string(),
        }
    }

    pub fn snapshot(&self) -> RpsSnapshot {
        RpsSnapshot {
            score: self.score,
            round: self.played + 1,
            rounds: ROUNDS,
            last_round: self.last_round,
            last_match: self.last_match,
            phase: Phase::AwaitingHuman,
            status: self.status(),
        }
    }
}
