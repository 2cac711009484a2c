//! Turns a line typed at the prompt into arcade commands.

use arcade::{Command, GameKind};
use chess_core::Side;

#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Quit,
    Help,
    Commands(Vec<Command>),
}

/// Parses `line` for a session of `kind`. Cells and cards are numbered
/// from 1 at the prompt.
pub fn parse(kind: GameKind, line: &str) -> Result<Input, String> {
    let line = line.trim();
    let lower = line.to_ascii_lowercase();
    match lower.as_str() {
        "q" | "quit" | "exit" => return Ok(Input::Quit),
        "?" | "help" => return Ok(Input::Help),
        "new" | "reset" => return Ok(Input::Commands(vec![Command::Reset])),
        _ => {}
    }

    let cmd = match kind {
        GameKind::Chess => {
            if let Some(side) = lower.strip_prefix("side ") {
                Command::ChooseSide {
                    side: parse_side(side)?,
                }
            } else if lower.len() == 2 {
                Command::Select { square: lower }
            } else {
                Command::Move { uci: lower }
            }
        }
        GameKind::TicTacToe => match lower.as_str() {
            "easy" | "hard" => Command::SetDifficulty { level: lower },
            _ => Command::Place {
                cell: numbered(&lower, 9)?,
            },
        },
        GameKind::MemoryMatch => Command::Flip {
            card: numbered(&lower, 16)?,
        },
        GameKind::Puzzle2048 => Command::Slide { direction: lower },
        GameKind::NumberGuesser => Command::Guess {
            value: line.to_string(),
        },
        GameKind::RockPaperScissors => Command::Throw { hand: lower },
        GameKind::Snake if lower.is_empty() => Command::Tick,
        GameKind::Snake => {
            return Ok(Input::Commands(vec![
                Command::Steer { direction: lower },
                Command::Tick,
            ]))
        }
        GameKind::ColorMatch | GameKind::ReactionTest => {
            return Err(format!("{} cannot be played in a terminal", kind))
        }
    };
    Ok(Input::Commands(vec![cmd]))
}

fn parse_side(s: &str) -> Result<Side, String> {
    match s.trim() {
        "white" | "w" => Ok(Side::White),
        "black" | "b" => Ok(Side::Black),
        other => Err(format!("'{}' is not a side, expected white or black", other)),
    }
}

/// A 1-based number up to `count`, as a 0-based index.
fn numbered(s: &str, count: usize) -> Result<usize, String> {
    s.parse::<usize>()
        .ok()
        .filter(|n| (1..=count).contains(n))
        .map(|n| n - 1)
        .ok_or_else(|| format!("enter a number from 1 to {}", count))
}

/// Prompt help for `kind`.
pub fn help(kind: GameKind) -> &'static str {
    match kind {
        GameKind::Chess => {
            "Type a square (e2) to select a piece and another to move it, or a whole move (e2e4, e7e8q). 'side black' plays the other side."
        }
        GameKind::TicTacToe => "Type a cell from 1 to 9, row by row. 'easy' or 'hard' sets the computer's strength.",
        GameKind::MemoryMatch => "Type a card number from 1 to 16 to turn it over.",
        GameKind::Puzzle2048 => "Slide with up, down, left, right or w, a, s, d.",
        GameKind::NumberGuesser => "Type a number between 1 and 100.",
        GameKind::RockPaperScissors => "Type rock, paper or scissors (r, p, s).",
        GameKind::Snake => "Steer with w, a, s, d; an empty line moves one step.",
        GameKind::ColorMatch | GameKind::ReactionTest => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commands(kind: GameKind, line: &str) -> Vec<Command> {
        match parse(kind, line) {
            Ok(Input::Commands(cmds)) => cmds,
            other => panic!("expected commands for {:?}, got {:?}", line, other),
        }
    }

    #[test]
    fn shared_words() {
        for kind in [GameKind::Chess, GameKind::Snake, GameKind::NumberGuesser] {
            assert_eq!(parse(kind, "quit\n"), Ok(Input::Quit));
            assert_eq!(parse(kind, "?"), Ok(Input::Help));
            assert_eq!(commands(kind, "Reset"), vec![Command::Reset]);
        }
    }

    #[test]
    fn chess_squares_moves_and_sides() {
        assert_eq!(
            commands(GameKind::Chess, "E2"),
            vec![Command::Select { square: "e2".into() }]
        );
        assert_eq!(
            commands(GameKind::Chess, "e7e8q"),
            vec![Command::Move { uci: "e7e8q".into() }]
        );
        assert_eq!(
            commands(GameKind::Chess, "side black"),
            vec![Command::ChooseSide { side: Side::Black }]
        );
        assert!(parse(GameKind::Chess, "side red").is_err());
    }

    #[test]
    fn numbered_cells_and_cards() {
        assert_eq!(
            commands(GameKind::TicTacToe, "1"),
            vec![Command::Place { cell: 0 }]
        );
        assert_eq!(
            commands(GameKind::MemoryMatch, "16"),
            vec![Command::Flip { card: 15 }]
        );
        assert!(parse(GameKind::TicTacToe, "0").is_err());
        assert!(parse(GameKind::MemoryMatch, "17").is_err());
        assert_eq!(
            commands(GameKind::TicTacToe, "Hard"),
            vec![Command::SetDifficulty { level: "hard".into() }]
        );
    }

    #[test]
    fn snake_steers_then_steps() {
        assert_eq!(commands(GameKind::Snake, ""), vec![Command::Tick]);
        assert_eq!(
            commands(GameKind::Snake, "a"),
            vec![Command::Steer { direction: "a".into() }, Command::Tick]
        );
    }
}
