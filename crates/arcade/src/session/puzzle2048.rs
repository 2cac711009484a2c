use super::{MoveOutcome, Phase};
use crate::error::ArcadeError;
use crate::store::{BestScore, Better, ScoreStore, BEST_2048};
use game_2048::{Direction, Game2048, SlideOutcome, CELLS};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Serialize;

pub struct Puzzle2048Session {
    game: Game2048,
    rng: Xoshiro256PlusPlus,
    best: BestScore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Puzzle2048Snapshot {
    /// Row-major from the top left; 0 is empty.
    pub cells: [u32; CELLS],
    pub score: u32,
    pub best: Option<i64>,
    pub moves: u32,
    pub phase: Phase,
    pub status: String,
}

impl Puzzle2048Session {
    pub fn new(store: &dyn ScoreStore, seed: u64) -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        Puzzle2048Session {
            game: Game2048::new(&mut rng),
            rng,
            best: BestScore::load(store, BEST_2048, Better::Higher),
        }
    }

    pub fn game(&self) -> &Game2048 {
        &self.game
    }

    pub fn best(&self) -> Option<i64> {
        self.best.value()
    }

    pub fn phase(&self) -> Phase {
        if self.game.is_over() {
            Phase::Terminal
        } else {
            Phase::AwaitingHuman
        }
    }

    /// A fresh grid. The best score carries over.
    pub fn reset(&mut self) {
        self.game = Game2048::new(&mut self.rng);
    }

    /// Slides the tiles toward `direction`. A slide that moves nothing is
    /// ignored and spawns no tile.
    pub fn slide(
        &mut self,
        direction: &str,
        store: &mut dyn ScoreStore,
    ) -> Result<MoveOutcome, ArcadeError> {
        let dir: Direction = direction
            .parse()
            .map_err(|e: game_2048::ParseDirectionError| ArcadeError::invalid(e.to_string()))?;
        if self.game.is_over() {
            return Ok(MoveOutcome::Ignored);
        }
        match self.game.slide(dir, &mut self.rng) {
            SlideOutcome::Unchanged => Ok(MoveOutcome::Ignored),
            SlideOutcome::Moved { game_over, .. } => {
                self.best.offer(store, i64::from(self.game.score()));
                if game_over {
                    tracing::info!(
                        score = self.game.score(),
                        max_tile = self.game.grid().max_tile(),
                        "2048 game over"
                    );
                }
                Ok(MoveOutcome::Applied)
            }
        }
    }

    pub fn status(&self) -> String {
        if self.game.is_over() {
            format!("Game Over! Final score: {}", self.game.score())
        } else {
            format!("Score: {}", self.game.score())
        }
    }

    pub fn snapshot(&self) -> Puzzle2048Snapshot {
        Puzzle2048Snapshot {
            cells: *self.game.grid().cells(),
            score: self.game.score(),
            best: self.best.value(),
            moves: self.game.moves(),
            phase: self.phase(),
            status: self.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use game_2048::Grid;

    #[test]
    fn merges_raise_the_best_score() {
        let mut store = MemoryStore::new();
        store.set(BEST_2048, 4).unwrap();
        let mut s = Puzzle2048Session::new(&store, 3);
        assert_eq!(s.best(), Some(4));

        let mut cells = [0; CELLS];
        cells[..4].copy_from_slice(&[2, 2, 2, 2]);
        s.game = Game2048::from_grid(Grid::from_cells(cells));

        assert_eq!(s.slide("left", &mut store).unwrap(), MoveOutcome::Applied);
        assert_eq!(s.game().score(), 8);
        assert_eq!(s.best(), Some(8));
        assert_eq!(store.get(BEST_2048), Some(8));
        assert_eq!(s.status(), "Score: 8");
    }

    #[test]
    fn unchanged_and_unknown_slides() {
        let mut store = MemoryStore::new();
        let mut s = Puzzle2048Session::new(&store, 3);
        let mut cells = [0; CELLS];
        cells[0] = 2;
        s.game = Game2048::from_grid(Grid::from_cells(cells));

        assert_eq!(s.slide("up", &mut store).unwrap(), MoveOutcome::Ignored);
        assert_eq!(s.game().moves(), 0);
        assert!(matches!(
            s.slide("diagonal", &mut store),
            Err(ArcadeError::InvalidInput(_))
        ));
    }

    #[test]
    fn stuck_grid_is_terminal() {
        let mut store = MemoryStore::new();
        let mut s = Puzzle2048Session::new(&store, 3);
        s.game = Game2048::from_grid(Grid::from_cells([
            2, 4, 2, 4, 4, 2, 4, 2, 2, 4, 2, 4, 4, 2, 4, 2,
        ]));
        assert_eq!(s.phase(), Phase::Terminal);
        assert_eq!(s.status(), "Game Over! Final score: 0");
        assert_eq!(s.slide("left", &mut store).unwrap(), MoveOutcome::Ignored);

        s.reset();
        assert_eq!(s.phase(), Phase::AwaitingHuman);
        assert_eq!(s.game().grid().empty_cells().count(), CELLS - 2);
    }
}
