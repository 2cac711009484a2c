//! The 4x4 grid and its slide-merge rule.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const SIZE: usize = 4;
pub const CELLS: usize = SIZE * SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Cell indices of line `i`, ordered from the edge tiles slide toward.
    fn line(self, i: usize) -> [usize; SIZE] {
        std::array::from_fn(|k| match self {
            Direction::Left => i * SIZE + k,
            Direction::Right => i * SIZE + (SIZE - 1 - k),
            Direction::Up => k * SIZE + i,
            Direction::Down => (SIZE - 1 - k) * SIZE + i,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown direction '{0}', expected up, down, left or right")]
pub struct ParseDirectionError(String);

/// Accepts the names, arrow-key names and WASD.
impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "arrowup" | "w" => Ok(Direction::Up),
            "down" | "arrowdown" | "s" => Ok(Direction::Down),
            "left" | "arrowleft" | "a" => Ok(Direction::Left),
            "right" | "arrowright" | "d" => Ok(Direction::Right),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        })
    }
}

/// Slides one line toward index 0. Each tile merges at most once, and the
/// pair nearest the edge merges first. Returns the points scored.
pub fn slide_line(line: &mut [u32; SIZE]) -> u32 {
    let tiles: Vec<u32> = line.iter().copied().filter(|&v| v != 0).collect();
    let mut out = [0u32; SIZE];
    let mut gained = 0;
    let mut n = 0;
    let mut i = 0;
    while i < tiles.len() {
        if i + 1 < tiles.len() && tiles[i] == tiles[i + 1] {
            let merged = tiles[i] * 2;
            out[n] = merged;
            gained += merged;
            i += 2;
        } else {
            out[n] = tiles[i];
            i += 1;
        }
        n += 1;
    }
    *line = out;
    gained
}

/// Sixteen cells, row-major from the top left; 0 is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Grid {
    cells: [u32; CELLS],
}

impl Grid {
    pub const fn new() -> Self {
        Grid { cells: [0; CELLS] }
    }

    pub const fn from_cells(cells: [u32; CELLS]) -> Self {
        Grid { cells }
    }

    pub fn cells(&self) -> &[u32; CELLS] {
        &self.cells
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        (row < SIZE && col < SIZE).then(|| self.cells[row * SIZE + col])
    }

    pub(crate) fn set(&mut self, index: usize, value: u32) {
        self.cells[index] = value;
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        (0..CELLS).filter(|&i| self.cells[i] == 0)
    }

    pub fn max_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Slides every line toward `dir`. Returns the points scored, or `None`
    /// (leaving the grid alone) if no tile would move.
    pub fn slide(&mut self, dir: Direction) -> Option<u32> {
        let mut next = *self;
        let mut gained = 0;
        for i in 0..SIZE {
            let idx = dir.line(i);
            let mut line = idx.map(|j| self.cells[j]);
            gained += slide_line(&mut line);
            for (j, v) in idx.into_iter().zip(line) {
                next.cells[j] = v;
            }
        }
        if next == *self {
            return None;
        }
        *self = next;
        Some(gained)
    }

    /// True if sliding in `dir` would change the grid.
    pub fn can_slide(&self, dir: Direction) -> bool {
        let mut probe = *self;
        probe.slide(dir).is_some()
    }

    /// True while some direction still changes the grid: an empty cell or
    /// two equal neighbours.
    pub fn can_move(&self) -> bool {
        if self.cells.contains(&0) {
            return true;
        }
        (0..SIZE).any(|r| {
            (0..SIZE).any(|c| {
                let v = self.cells[r * SIZE + c];
                (c + 1 < SIZE && self.cells[r * SIZE + c + 1] == v)
                    || (r + 1 < SIZE && self.cells[(r + 1) * SIZE + c] == v)
            })
        })
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.cells.chunks(SIZE).enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for (c, v) in row.iter().enumerate() {
                if c > 0 {
                    f.write_str(" ")?;
                }
                match v {
                    0 => write!(f, "{:>5}", ".")?,
                    v => write!(f, "{:>5}", v)?,
                }
            }
        }
        Ok(())
    }
}
