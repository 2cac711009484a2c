//! A running 2048 game: the grid, the score, and random tile spawns.

use crate::grid::{Direction, Grid};
use rand::Rng;
use serde::Serialize;

/// Chance that a spawned tile is a 2 rather than a 4.
pub const TWO_PROBABILITY: f64 = 0.9;

/// What one slide did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SlideOutcome {
    /// Nothing moved; no tile was spawned and the move does not count.
    Unchanged,
    Moved {
        gained: u32,
        /// Cell that received the new tile.
        spawned: Option<usize>,
        game_over: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game2048 {
    grid: Grid,
    score: u32,
    moves: u32,
}

impl Game2048 {
    /// An empty grid with two tiles spawned.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut game = Game2048::from_grid(Grid::new());
        game.spawn_tile(rng);
        game.spawn_tile(rng);
        game
    }

    /// Resumes from an arbitrary grid with a zero score.
    pub fn from_grid(grid: Grid) -> Self {
        Game2048 {
            grid,
            score: 0,
            moves: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_over(&self) -> bool {
        !self.grid.can_move()
    }

    /// Directions that would change the grid.
    pub fn legal_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL
            .into_iter()
            .filter(|&d| self.grid.can_slide(d))
    }

    /// Puts a 2 (or, one time in ten, a 4) on a uniformly chosen empty
    /// cell. Returns the cell, or `None` when the grid is full.
    pub fn spawn_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        let empty: Vec<usize> = self.grid.empty_cells().collect();
        if empty.is_empty() {
            return None;
        }
        let cell = empty[rng.random_range(0..empty.len())];
        let value = if rng.random_bool(TWO_PROBABILITY) { 2 } else { 4 };
        self.grid.set(cell, value);
        Some(cell)
    }

    /// Slides toward `dir`; if anything moved, adds the merged values to
    /// the score and spawns a tile.
    pub fn slide<R: Rng + ?Sized>(&mut self, dir: Direction, rng: &mut R) -> SlideOutcome {
        let Some(gained) = self.grid.slide(dir) else {
            return SlideOutcome::Unchanged;
        };
        self.score += gained;
        self.moves += 1;
        let spawned = self.spawn_tile(rng);
        SlideOutcome::Moved {
            gained,
            spawned,
            game_over: self.is_over(),
        }
    }
}
