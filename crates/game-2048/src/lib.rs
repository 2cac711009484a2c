//! 2048 on a 4x4 grid.
//!
//! ```
//! use game_2048::{Direction, Grid};
//!
//! let mut grid = Grid::from_cells([2, 2, 2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
//! assert_eq!(grid.slide(Direction::Left), Some(8));
//! assert_eq!(grid.get(0, 0), Some(4));
//! assert_eq!(grid.get(0, 1), Some(4));
//! ```

mod game;
mod grid;

pub use game::{Game2048, SlideOutcome, TWO_PROBABILITY};
pub use grid::{slide_line, Direction, Grid, ParseDirectionError, CELLS, SIZE};
