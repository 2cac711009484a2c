use super::{MoveOutcome, Phase};
use crate::error::ArcadeError;
use crate::store::{BestScore, Better, ScoreStore, SNAKE_HIGH_SCORE};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Serialize;
use std::collections::VecDeque;
use std::str::FromStr;
use thiserror::Error;

/// Cells per side of the square field.
pub const FIELD: i32 = 20;
/// Points per food eaten.
pub const FOOD_POINTS: u32 = 10;

/// Where the snake is going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    pub const fn opposite(self) -> Self {
        match self {
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown direction '{0}', expected up, down, left or right")]
pub struct ParseHeadingError(String);

/// Accepts the names, arrow-key names and WASD.
impl FromStr for Heading {
    type Err = ParseHeadingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "arrowup" | "w" => Ok(Heading::Up),
            "down" | "arrowdown" | "s" => Ok(Heading::Down),
            "left" | "arrowleft" | "a" => Ok(Heading::Left),
            "right" | "arrowright" | "d" => Ok(Heading::Right),
            _ => Err(ParseHeadingError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    /// The neighbouring point toward `heading`, with y growing downward.
    const fn step(self, heading: Heading) -> Self {
        match heading {
            Heading::Up => Point::new(self.x, self.y - 1),
            Heading::Down => Point::new(self.x, self.y + 1),
            Heading::Left => Point::new(self.x - 1, self.y),
            Heading::Right => Point::new(self.x + 1, self.y),
        }
    }

    const fn on_field(self) -> bool {
        self.x >= 0 && self.x < FIELD && self.y >= 0 && self.y < FIELD
    }
}

pub const START: Point = Point::new(10, 10);

/// Snake on a 20x20 field, advanced one cell per [`tick`](Self::tick).
/// It waits in place until the first direction is given.
pub struct SnakeSession {
    /// Head first.
    body: VecDeque<Point>,
    /// Direction of the last step taken.
    heading: Option<Heading>,
    /// Direction of the next step.
    next: Option<Heading>,
    food: Option<Point>,
    score: u32,
    alive: bool,
    rng: Xoshiro256PlusPlus,
    best: BestScore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnakeSnapshot {
    pub size: i32,
    /// Head first.
    pub body: Vec<Point>,
    pub food: Option<Point>,
    pub score: u32,
    pub best: Option<i64>,
    pub phase: Phase,
    pub status: String,
}

impl SnakeSession {
    pub fn new(store: &dyn ScoreStore, seed: u64) -> Self {
        let mut session = SnakeSession {
            body: VecDeque::new(),
            heading: None,
            next: None,
            food: None,
            score: 0,
            alive: true,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            best: BestScore::load(store, SNAKE_HIGH_SCORE, Better::Higher),
        };
        session.reset();
        session
    }

    pub fn head(&self) -> Point {
        self.body.front().copied().unwrap_or(START)
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn food(&self) -> Option<Point> {
        self.food
    }

    pub fn best(&self) -> Option<i64> {
        self.best.value()
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn phase(&self) -> Phase {
        if self.alive {
            Phase::AwaitingHuman
        } else {
            Phase::Terminal
        }
    }

    pub fn reset(&mut self) {
        self.body.clear();
        self.body.push_back(START);
        self.heading = None;
        self.next = None;
        self.score = 0;
        self.alive = true;
        self.place_food();
    }

    /// Puts food on a uniformly chosen cell the snake does not cover.
    fn place_food(&mut self) {
        let free: Vec<Point> = (0..FIELD)
            .flat_map(|y| (0..FIELD).map(move |x| Point::new(x, y)))
            .filter(|p| !self.body.contains(p))
            .collect();
        self.food = if free.is_empty() {
            None
        } else {
            Some(free[self.rng.random_range(0..free.len())])
        };
    }

    /// Sets the direction of the next step. Turning straight back is
    /// ignored.
    pub fn steer(&mut self, direction: &str) -> Result<MoveOutcome, ArcadeError> {
        let dir: Heading = direction
            .parse()
            .map_err(|e: ParseHeadingError| ArcadeError::invalid(e.to_string()))?;
        if !self.alive || self.heading == Some(dir.opposite()) || self.next == Some(dir) {
            return Ok(MoveOutcome::Ignored);
        }
        self.next = Some(dir);
        Ok(MoveOutcome::Applied)
    }

    /// Advances the snake one cell. Eating grows it by one; leaving the
    /// field or running into itself ends the game and leaves the body where
    /// it was.
    pub fn tick(&mut self, store: &mut dyn ScoreStore) -> MoveOutcome {
        let Some(dir) = self.next.filter(|_| self.alive) else {
            return MoveOutcome::Ignored;
        };
        self.heading = Some(dir);
        let head = self.head().step(dir);
        let eats = self.food == Some(head);
        // The tail moves out of the way unless the snake grows.
        let blocking = if eats {
            self.body.len()
        } else {
            self.body.len().saturating_sub(1)
        };
        if !head.on_field() || self.body.iter().take(blocking).any(|&p| p == head) {
            self.alive = false;
            tracing::info!(score = self.score, length = self.body.len(), "snake game over");
            return MoveOutcome::Applied;
        }
        if !eats {
            self.body.pop_back();
        }
        self.body.push_front(head);
        if eats {
            self.score += FOOD_POINTS;
            self.best.offer(store, i64::from(self.score));
            self.place_food();
        }
        MoveOutcome::Applied
    }

    pub fn status(&self) -> String {
        if !self.alive {
            format!("Game Over! Your score: {}", self.score)
        } else if self.next.is_none() {
            "Press an arrow key to start".to_string()
        } else {
            format!("Score: {}", self.score)
        }
    }

    pub fn snapshot(&self) -> SnakeSnapshot {
        SnakeSnapshot {
            size: FIELD,
            body: self.body.iter().copied().collect(),
            food: self.food,
            score: self.score,
            best: self.best.value(),
            phase: self.phase(),
            status: self.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn session(store: &MemoryStore) -> SnakeSession {
        SnakeSession::new(store, 21)
    }

    #[test]
    fn idle_until_steered() {
        let mut store = MemoryStore::new();
        let mut s = session(&store);
        assert_eq!(s.tick(&mut store), MoveOutcome::Ignored);
        assert_eq!(s.head(), START);
        assert_eq!(s.status(), "Press an arrow key to start");

        s.steer("right").unwrap();
        s.food = Some(Point::new(0, 0));
        s.tick(&mut store);
        assert_eq!(s.head(), Point::new(11, 10));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn food_is_never_under_the_snake() {
        let store = MemoryStore::new();
        let mut s = session(&store);
        for _ in 0..200 {
            s.place_food();
            let food = s.food().unwrap();
            assert!(food.on_field());
            assert!(!s.body.contains(&food));
        }
    }

    #[test]
    fn eating_grows_and_scores() {
        let mut store = MemoryStore::new();
        let mut s = session(&store);
        s.food = Some(Point::new(10, 9));
        s.steer("up").unwrap();
        s.tick(&mut store);
        assert_eq!(s.len(), 2);
        assert_eq!(s.score(), 10);
        assert_eq!(s.best(), Some(10));
        assert_eq!(store.get(SNAKE_HIGH_SCORE), Some(10));
        assert_ne!(s.food(), Some(Point::new(10, 9)));
    }

    #[test]
    fn reversing_is_ignored() {
        let mut store = MemoryStore::new();
        let mut s = session(&store);
        s.food = Some(Point::new(0, 0));
        s.steer("left").unwrap();
        s.tick(&mut store);
        assert_eq!(s.steer("right").unwrap(), MoveOutcome::Ignored);
        assert_eq!(s.steer("left").unwrap(), MoveOutcome::Ignored);
        assert_eq!(s.steer("up").unwrap(), MoveOutcome::Applied);
        // Still heading left until the next tick, so right stays blocked.
        assert_eq!(s.steer("right").unwrap(), MoveOutcome::Ignored);
        assert!(matches!(s.steer("north"), Err(ArcadeError::InvalidInput(_))));
    }

    #[test]
    fn wall_ends_the_game() {
        let mut store = MemoryStore::new();
        let mut s = session(&store);
        s.food = Some(Point::new(0, 19));
        s.steer("up").unwrap();
        for _ in 0..10 {
            s.tick(&mut store);
        }
        assert_eq!(s.head(), Point::new(10, 0));
        assert!(s.is_alive());
        s.tick(&mut store);
        assert!(!s.is_alive());
        assert_eq!(s.head(), Point::new(10, 0));
        assert_eq!(s.len(), 1);
        assert_eq!(s.status(), "Game Over! Your score: 0");
        assert_eq!(s.tick(&mut store), MoveOutcome::Ignored);
        assert_eq!(s.steer("down").unwrap(), MoveOutcome::Ignored);

        s.reset();
        assert!(s.is_alive());
        assert_eq!(s.head(), START);
    }

    #[test]
    fn running_into_itself_ends_the_game() {
        let mut store = MemoryStore::new();
        let mut s = session(&store);
        s.body = [(5, 5), (6, 5), (6, 6), (5, 6), (4, 6)]
            .into_iter()
            .map(|(x, y)| Point::new(x, y))
            .collect();
        s.heading = Some(Heading::Left);
        s.food = Some(Point::new(0, 0));
        let before = s.snapshot().body;
        s.steer("down").unwrap();
        s.tick(&mut store);
        assert!(!s.is_alive());
        assert_eq!(s.snapshot().body, before);
    }

    #[test]
    fn biting_the_tail_while_growing_ends_the_game() {
        let mut store = MemoryStore::new();
        let mut s = session(&store);
        s.body = [(5, 5), (6, 5), (6, 6), (5, 6)]
            .into_iter()
            .map(|(x, y)| Point::new(x, y))
            .collect();
        s.heading = Some(Heading::Left);
        // Food under the tail keeps it from moving away.
        s.food = Some(Point::new(5, 6));
        s.steer("down").unwrap();
        s.tick(&mut store);
        assert!(!s.is_alive());
        assert_eq!(s.len(), 4);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn headings_parse_keys_and_names() {
        assert_eq!("ArrowUp".parse::<Heading>(), Ok(Heading::Up));
        assert_eq!(" d ".parse::<Heading>(), Ok(Heading::Right));
        assert_eq!("left".parse::<Heading>(), Ok(Heading::Left));
        assert_eq!(Heading::Down.opposite(), Heading::Up);
        let err = "north".parse::<Heading>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown direction 'north', expected up, down, left or right"
        );
    }

    #[test]
    fn following_the_tail_is_safe() {
        let mut store = MemoryStore::new();
        let mut s = session(&store);
        s.body = [(5, 5), (6, 5), (6, 6), (5, 6)]
            .into_iter()
            .map(|(x, y)| Point::new(x, y))
            .collect();
        s.heading = Some(Heading::Left);
        s.food = Some(Point::new(0, 0));
        s.steer("down").unwrap();
        s.tick(&mut store);
        assert!(s.is_alive());
        assert_eq!(s.head(), Point::new(5, 6));
    }
}
