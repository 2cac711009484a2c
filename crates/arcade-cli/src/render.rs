//! Plain-text drawings of session snapshots.

use arcade::session::chess::ChessSnapshot;
use arcade::session::guesser::GuesserSnapshot;
use arcade::session::memory::MemorySnapshot;
use arcade::session::puzzle2048::Puzzle2048Snapshot;
use arcade::session::rps::RpsSnapshot;
use arcade::session::snake::{Point, SnakeSnapshot};
use arcade::session::tictactoe::TicTacToeSnapshot;
use arcade::Snapshot;
use std::fmt::Write;

pub fn snapshot(snap: &Snapshot) -> String {
    let mut out = String::new();
    match snap {
        Snapshot::Chess(s) => chess(&mut out, s),
        Snapshot::TicTacToe(s) => tictactoe(&mut out, s),
        Snapshot::Puzzle2048(s) => puzzle2048(&mut out, s),
        Snapshot::NumberGuesser(s) => guesser(&mut out, s),
        Snapshot::RockPaperScissors(s) => rps(&mut out, s),
        Snapshot::MemoryMatch(s) => memory(&mut out, s),
        Snapshot::Snake(s) => snake(&mut out, s),
    }
    out.push_str(snap.status());
    out
}

fn best(best: Option<i64>) -> String {
    best.map_or_else(|| "-".to_string(), |b| b.to_string())
}

fn chess(out: &mut String, s: &ChessSnapshot) {
    const FILES: &str = "  a b c d e f g h";
    let _ = writeln!(out, "{}", FILES);
    for (row, pieces) in s.board.iter().enumerate() {
        let rank = 8 - row;
        let _ = write!(out, "{} ", rank);
        for (file, piece) in pieces.iter().enumerate() {
            let target = s
                .targets
                .iter()
                .any(|sq| sq.file() as usize == file && sq.rank() as usize + 1 == rank);
            let c = match piece {
                Some(p) => *p,
                None if target => '*',
                None => '.',
            };
            let _ = write!(out, "{} ", c);
        }
        let _ = writeln!(out, "{}", rank);
    }
    let _ = writeln!(out, "{}", FILES);
    if let Some(from) = s.selected {
        let targets: Vec<String> = s.targets.iter().map(|sq| sq.to_string()).collect();
        let _ = writeln!(out, "Selected {}: {}", from, targets.join(" "));
    }
    if let Some(mv) = &s.last_move {
        let _ = writeln!(out, "Last move: {}", mv);
    }
}

fn tictactoe(out: &mut String, s: &TicTacToeSnapshot) {
    for row in 0..3 {
        let cells: Vec<String> = (0..3)
            .map(|col| {
                let i = row * 3 + col;
                s.cells[i].map_or_else(|| (i + 1).to_string(), |m| m.to_string())
            })
            .collect();
        let _ = writeln!(out, " {} ", cells.join(" | "));
        if row < 2 {
            out.push_str("---+---+---\n");
        }
    }
    let _ = writeln!(out, "Difficulty: {:?}", s.difficulty);
}

fn puzzle2048(out: &mut String, s: &Puzzle2048Snapshot) {
    for row in s.cells.chunks(4) {
        for &tile in row {
            if tile == 0 {
                let _ = write!(out, "{:>6}", ".");
            } else {
                let _ = write!(out, "{:>6}", tile);
            }
        }
        out.push('\n');
    }
    let _ = writeln!(out, "Best: {}  Moves: {}", best(s.best), s.moves);
}

fn guesser(out: &mut String, s: &GuesserSnapshot) {
    if !s.guesses.is_empty() {
        let guesses: Vec<String> = s.guesses.iter().map(u32::to_string).collect();
        let _ = writeln!(out, "Guesses: {}", guesses.join(", "));
    }
    let _ = writeln!(out, "Attempts: {}  Best: {}", s.attempts, best(s.best));
}

fn rps(out: &mut String, s: &RpsSnapshot) {
    if let Some(round) = s.last_round {
        let _ = writeln!(out, "You: {}  Computer: {}", round.player, round.computer);
    }
    let _ = writeln!(out, "Round {}/{}  Score: {}", s.round, s.rounds, s.score);
}

fn memory(out: &mut String, s: &MemorySnapshot) {
    for (row, cards) in s.cards.chunks(4).enumerate() {
        for (col, card) in cards.iter().enumerate() {
            match card {
                Some(symbol) => {
                    let _ = write!(out, "{:>4}", symbol);
                }
                None => {
                    let _ = write!(out, "{:>4}", row * 4 + col + 1);
                }
            }
        }
        out.push('\n');
    }
}

fn snake(out: &mut String, s: &SnakeSnapshot) {
    let border = "#".repeat(s.size as usize + 2);
    let _ = writeln!(out, "{}", border);
    for y in 0..s.size {
        out.push('#');
        for x in 0..s.size {
            let p = Point::new(x, y);
            let c = if s.body.first() == Some(&p) {
                '@'
            } else if s.body.contains(&p) {
                'o'
            } else if s.food == Some(p) {
                '*'
            } else {
                ' '
            };
            out.push(c);
        }
        out.push_str("#\n");
    }
    let _ = writeln!(out, "{}", border);
    let _ = writeln!(out, "Best: {}", best(s.best));
}
