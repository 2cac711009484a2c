//! The 3x3 board.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub const fn opposite(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Cell triples that win: three rows, three columns, two diagonals.
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Where the game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Outcome {
    InProgress,
    Won { mark: Mark, line: [usize; 3] },
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceError {
    #[error("cell {0} is off the board, expected 0-8")]
    OutOfRange(usize),

    #[error("cell {0} is already taken")]
    Occupied(usize),

    #[error("the game is over")]
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid board: {0}")]
pub struct ParseBoardError(String);

/// Nine cells, row-major from the top left, plus whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Option<Mark>; 9],
    to_move: Mark,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// An empty board with X to move.
    pub const fn new() -> Self {
        Board {
            cells: [None; 9],
            to_move: Mark::X,
        }
    }

    #[inline]
    pub fn cell(&self, index: usize) -> Option<Mark> {
        self.cells.get(index).copied().flatten()
    }

    pub fn cells(&self) -> &[Option<Mark>; 9] {
        &self.cells
    }

    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    /// Number of marks placed.
    pub fn marks(&self) -> usize {
        self.cells.iter().flatten().count()
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        (0..9).filter(|&i| self.cells[i].is_none())
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// The first completed line, in [`WIN_LINES`] order.
    pub fn winner(&self) -> Option<(Mark, [usize; 3])> {
        WIN_LINES.iter().find_map(|&line| {
            let [a, b, c] = line;
            match self.cells[a] {
                Some(mark) if self.cells[b] == Some(mark) && self.cells[c] == Some(mark) => {
                    Some((mark, line))
                }
                _ => None,
            }
        })
    }

    pub fn outcome(&self) -> Outcome {
        match self.winner() {
            Some((mark, line)) => Outcome::Won { mark, line },
            None if self.is_full() => Outcome::Draw,
            None => Outcome::InProgress,
        }
    }

    /// Places the side to move's mark on `index` and passes the turn.
    pub fn place(&mut self, index: usize) -> Result<(), PlaceError> {
        if self.outcome() != Outcome::InProgress {
            return Err(PlaceError::GameOver);
        }
        match self.cells.get(index) {
            None => Err(PlaceError::OutOfRange(index)),
            Some(Some(_)) => Err(PlaceError::Occupied(index)),
            Some(None) => {
                self.set(index);
                Ok(())
            }
        }
    }

    pub(crate) fn set(&mut self, index: usize) {
        self.cells[index] = Some(self.to_move);
        self.to_move = self.to_move.opposite();
    }

    pub(crate) fn clear(&mut self, index: usize) {
        self.cells[index] = None;
        self.to_move = self.to_move.opposite();
    }
}

/// Nine characters, `X`, `O` or `-`/`.` for empty, optionally split by `/`
/// into rows. X moves first, so the side to move follows from the counts.
impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = [None; 9];
        let mut n = 0;
        for c in s.chars().filter(|&c| c != '/') {
            let mark = match c {
                'X' | 'x' => Some(Mark::X),
                'O' | 'o' => Some(Mark::O),
                '-' | '.' => None,
                other => return Err(ParseBoardError(format!("unexpected '{}'", other))),
            };
            if n == 9 {
                return Err(ParseBoardError("more than 9 cells".into()));
            }
            cells[n] = mark;
            n += 1;
        }
        if n != 9 {
            return Err(ParseBoardError(format!("{} cells, expected 9", n)));
        }

        let xs = cells.iter().filter(|&&c| c == Some(Mark::X)).count();
        let os = cells.iter().filter(|&&c| c == Some(Mark::O)).count();
        let to_move = match xs.checked_sub(os) {
            Some(0) => Mark::X,
            Some(1) => Mark::O,
            _ => return Err(ParseBoardError(format!("{} X against {} O", xs, os))),
        };
        Ok(Board { cells, to_move })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.chunks(3).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for (col, cell) in cells.iter().enumerate() {
                let c = match cell {
                    Some(mark) => mark.symbol(),
                    None => char::from(b'0' + (row * 3 + col) as u8),
                };
                if col > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn top_row_wins() {
        let b: Board = Board {
            cells: [
                Some(Mark::X),
                Some(Mark::X),
                Some(Mark::X),
                None,
                None,
                None,
                None,
                None,
                None,
            ],
            to_move: Mark::O,
        };
        assert_eq!(b.winner(), Some((Mark::X, [0, 1, 2])));
        assert_eq!(
            b.outcome(),
            Outcome::Won {
                mark: Mark::X,
                line: [0, 1, 2]
            }
        );
    }

    #[test]
    fn diagonal_and_column() {
        assert_eq!(board("OXX/-O-/X-O").winner(), Some((Mark::O, [0, 4, 8])));
        assert_eq!(board("-XO/-XO/X-O").winner(), Some((Mark::O, [2, 5, 8])));
    }

    #[test]
    fn full_board_without_line_is_a_draw() {
        let b = board("XOX/XOO/OXX");
        assert_eq!(b.winner(), None);
        assert_eq!(b.outcome(), Outcome::Draw);
    }

    #[test]
    fn place_alternates_and_validates() {
        let mut b = Board::new();
        b.place(4).unwrap();
        assert_eq!(b.cell(4), Some(Mark::X));
        assert_eq!(b.to_move(), Mark::O);

        assert_eq!(b.place(4), Err(PlaceError::Occupied(4)));
        assert_eq!(b.place(9), Err(PlaceError::OutOfRange(9)));
        assert_eq!(b.to_move(), Mark::O);

        let mut won = board("XXX/OO-/---");
        assert_eq!(won.place(5), Err(PlaceError::GameOver));
    }

    #[test]
    fn parse_rejects_bad_boards() {
        assert!("XX".parse::<Board>().is_err());
        assert!("XXXXXXXXXX".parse::<Board>().is_err());
        assert!("OO-------".parse::<Board>().is_err());
        assert!("Z--------".parse::<Board>().is_err());
        assert_eq!(board("X--------").to_move(), Mark::O);
    }

    #[test]
    fn display_numbers_empty_cells() {
        assert_eq!(board("X--/-O-/---").to_string(), "X 1 2\n3 O 5\n6 7 8");
    }
}
