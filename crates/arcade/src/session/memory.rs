use super::{MoveOutcome, Phase};
use crate::error::ArcadeError;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Serialize;

pub const SYMBOLS: [char; 8] = ['🐶', '🐱', '🐭', '🐹', '🐰', '🦊', '🐻', '🐼'];
pub const CARDS: usize = SYMBOLS.len() * 2;

/// Memory Match: sixteen face-down cards in eight pairs.
///
/// Flipping a second card counts a move. A matching pair stays up; a
/// mismatched one stays up until [`settle`](Self::settle) turns it back
/// over, and no other card can be flipped meanwhile.
pub struct MemorySession {
    /// Symbol index of each card.
    deck: [u8; CARDS],
    matched: [bool; CARDS],
    /// Face-up cards of the current turn.
    flipped: Vec<usize>,
    moves: u32,
    rng: Xoshiro256PlusPlus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemorySnapshot {
    /// Symbols of the face-up cards; `None` for face-down ones.
    pub cards: Vec<Option<char>>,
    pub moves: u32,
    pub pairs: usize,
    /// Two unmatched cards are showing and wait for a settle.
    pub awaiting_settle: bool,
    pub phase: Phase,
    pub status: String,
}

impl MemorySession {
    pub fn new(seed: u64) -> Self {
        let mut session = MemorySession {
            deck: [0; CARDS],
            matched: [false; CARDS],
            flipped: Vec::with_capacity(2),
            moves: 0,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        };
        session.reset();
        session
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn pairs(&self) -> usize {
        self.matched.iter().filter(|&&m| m).count() / 2
    }

    pub fn is_won(&self) -> bool {
        self.matched.iter().all(|&m| m)
    }

    pub fn phase(&self) -> Phase {
        if self.is_won() {
            Phase::Terminal
        } else {
            Phase::AwaitingHuman
        }
    }

    /// Reshuffles and turns every card face down.
    pub fn reset(&mut self) {
        for (i, card) in self.deck.iter_mut().enumerate() {
            *card = (i % SYMBOLS.len()) as u8;
        }
        self.deck.shuffle(&mut self.rng);
        self.matched = [false; CARDS];
        self.flipped.clear();
        self.moves = 0;
    }

    fn is_face_up(&self, card: usize) -> bool {
        self.matched[card] || self.flipped.contains(&card)
    }

    pub fn flip(&mut self, card: usize) -> Result<MoveOutcome, ArcadeError> {
        if card >= CARDS {
            return Err(ArcadeError::invalid(format!(
                "card {} does not exist, expected 0 to {}",
                card,
                CARDS - 1
            )));
        }
        if self.flipped.len() == 2 || self.is_face_up(card) || self.is_won() {
            return Ok(MoveOutcome::Ignored);
        }
        self.flipped.push(card);

        if self.flipped.len() == 2 {
            let (a, b) = (self.flipped[0], self.flipped[1]);
            self.moves += 1;
            if self.deck[a] == self.deck[b] {
                self.matched[a] = true;
                self.matched[b] = true;
                self.flipped.clear();
                if self.is_won() {
                    tracing::info!(moves = self.moves, "memory match won");
                }
            }
        }
        Ok(MoveOutcome::Applied)
    }

    /// Turns a mismatched pair back over.
    pub fn settle(&mut self) -> MoveOutcome {
        if self.flipped.len() < 2 {
            return MoveOutcome::Ignored;
        }
        self.flipped.clear();
        MoveOutcome::Applied
    }

    pub fn status(&self) -> String {
        if self.is_won() {
            format!("Congratulations! You won in {} moves!", self.moves)
        } else {
            format!("Moves: {}  Pairs: {}/{}", self.moves, self.pairs(), SYMBOLS.len())
        }
    }

    pub fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            cards: (0..CARDS)
                .map(|i| self.is_face_up(i).then(|| SYMBOLS[self.deck[i] as usize]))
                .collect(),
            moves: self.moves,
            pairs: self.pairs(),
            awaiting_settle: self.flipped.len() == 2,
            phase: self.phase(),
            status: self.status(),
        }
    }
}
