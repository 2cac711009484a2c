use super::{MoveOutcome, Phase};
use crate::error::ArcadeError;
use crate::store::{BestScore, Better, ScoreStore, NUMBER_GUESS_BEST};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Serialize;
use std::cmp::Ordering;
use std::ops::RangeInclusive;

pub const RANGE: RangeInclusive<u32> = 1..=100;

/// Guess a secret number between 1 and 100 with higher/lower hints. The
/// best score is the fewest attempts.
pub struct GuesserSession {
    secret: u32,
    guesses: Vec<u32>,
    message: String,
    rng: Xoshiro256PlusPlus,
    best: BestScore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuesserSnapshot {
    pub attempts: u32,
    pub guesses: Vec<u32>,
    pub best: Option<i64>,
    pub phase: Phase,
    pub status: String,
}

impl GuesserSession {
    pub fn new(store: &dyn ScoreStore, seed: u64) -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        GuesserSession {
            secret: rng.random_range(RANGE),
            guesses: Vec::new(),
            message: String::new(),
            rng,
            best: BestScore::load(store, NUMBER_GUESS_BEST, Better::Lower),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.guesses.len() as u32
    }

    pub fn best(&self) -> Option<i64> {
        self.best.value()
    }

    fn solved(&self) -> bool {
        self.guesses.last() == Some(&self.secret)
    }

    pub fn phase(&self) -> Phase {
        if self.solved() {
            Phase::Terminal
        } else {
            Phase::AwaitingHuman
        }
    }

    /// Picks a new secret.
    pub fn reset(&mut self) {
        self.secret = self.rng.random_range(RANGE);
        self.guesses.clear();
        self.message.clear();
    }

    /// Takes one guess. Text that is not a number from 1 to 100 is rejected
    /// without using up an attempt.
    pub fn guess(&mut self, text: &str, store: &mut dyn ScoreStore) -> Result<MoveOutcome, ArcadeError> {
        let guess = text
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|g| RANGE.contains(g))
            .ok_or_else(|| ArcadeError::invalid("Please enter a number between 1 and 100"))?;
        if self.solved() {
            return Ok(MoveOutcome::Ignored);
        }

        self.guesses.push(guess);
        self.message = match guess.cmp(&self.secret) {
            Ordering::Less => "Too low! Try a higher number.".to_string(),
            Ordering::Greater => "Too high! Try a lower number.".to_string(),
            Ordering::Equal => {
                let attempts = self.attempts();
                tracing::info!(attempts, "number guessed");
                self.best.offer(store, i64::from(attempts));
                format!(
                    "Correct! The number was {}. You guessed it in {} attempts!",
                    self.secret, attempts
                )
            }
        };
        Ok(MoveOutcome::Applied)
    }

    pub fn status(&self) -> String {
        if self.message.is_empty() {
            "I'm thinking of a number between 1 and 100".to_string()
        } else {
            self.message.clone()
        }
    }

    pub fn snapshot(&self) -> GuesserSnapshot {
        GuesserSnapshot {
            attempts: self.attempts(),
            guesses: self.guesses.clone(),
            best: self.best.value(),
            phase: self.phase(),
            status: self.status(),
        }
    }
}
