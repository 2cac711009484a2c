//! One session per open game, and the routing of commands to them.

pub mod chess;
pub mod guesser;
pub mod memory;
pub mod puzzle2048;
pub mod rps;
pub mod snake;
pub mod tictactoe;

use crate::arcade::Command;
use crate::capabilities::Confirm;
use crate::catalog::GameKind;
use crate::error::ArcadeError;
use crate::store::ScoreStore;
use serde::Serialize;

use self::chess::{ChessSession, ChessSnapshot};
use self::guesser::{GuesserSession, GuesserSnapshot};
use self::memory::{MemorySession, MemorySnapshot};
use self::puzzle2048::{Puzzle2048Session, Puzzle2048Snapshot};
use self::rps::{RpsSession, RpsSnapshot};
use self::snake::{SnakeSession, SnakeSnapshot};
use self::tictactoe::{TicTacToeSession, TicTacToeSnapshot};

/// Whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingHuman,
    /// The host should send [`Command::AiMove`], after its display delay.
    AwaitingAi,
    Terminal,
}

/// What a well-formed command did. Moves the rules forbid, and commands
/// that do not apply in the current phase, are `Ignored` and change nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveOutcome {
    Applied,
    Ignored,
}

/// Collaborators a command may need while it runs.
pub(crate) struct Context<'a> {
    pub store: &'a mut dyn ScoreStore,
    pub confirm: Option<&'a mut dyn Confirm>,
}

pub(crate) enum Session {
    Chess(ChessSession),
    TicTacToe(TicTacToeSession),
    Puzzle2048(Puzzle2048Session),
    NumberGuesser(GuesserSession),
    RockPaperScissors(RpsSession),
    MemoryMatch(MemorySession),
    Snake(SnakeSession),
}

impl Session {
    pub fn kind(&self) -> GameKind {
        match self {
            Session::Chess(_) => GameKind::Chess,
            Session::TicTacToe(_) => GameKind::TicTacToe,
            Session::Puzzle2048(_) => GameKind::Puzzle2048,
            Session::NumberGuesser(_) => GameKind::NumberGuesser,
            Session::RockPaperScissors(_) => GameKind::RockPaperScissors,
            Session::MemoryMatch(_) => GameKind::MemoryMatch,
            Session::Snake(_) => GameKind::Snake,
        }
    }

    pub fn reset(&mut self) {
        match self {
            Session::Chess(s) => s.reset(),
            Session::TicTacToe(s) => s.reset(),
            Session::Puzzle2048(s) => s.reset(),
            Session::NumberGuesser(s) => s.reset(),
            Session::RockPaperScissors(s) => s.reset(),
            Session::MemoryMatch(s) => s.reset(),
            Session::Snake(s) => s.reset(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        match self {
            Session::Chess(s) => Snapshot::Chess(s.snapshot()),
            Session::TicTacToe(s) => Snapshot::TicTacToe(s.snapshot()),
            Session::Puzzle2048(s) => Snapshot::Puzzle2048(s.snapshot()),
            Session::NumberGuesser(s) => Snapshot::NumberGuesser(s.snapshot()),
            Session::RockPaperScissors(s) => Snapshot::RockPaperScissors(s.snapshot()),
            Session::MemoryMatch(s) => Snapshot::MemoryMatch(s.snapshot()),
            Session::Snake(s) => Snapshot::Snake(s.snapshot()),
        }
    }

    /// Routes `command` to the session. A command meant for another game is
    /// invalid input.
    pub fn handle(
        &mut self,
        command: &Command,
        ctx: Context<'_>,
    ) -> Result<MoveOutcome, ArcadeError> {
        if let Command::Reset = command {
            self.reset();
            return Ok(MoveOutcome::Applied);
        }
        match (self, command) {
            (Session::Chess(s), Command::Select { square }) => s.select(square),
            (Session::Chess(s), Command::Move { uci }) => s.play(uci),
            (Session::Chess(s), Command::ChooseSide { side }) => s.choose_side(*side, ctx.confirm),
            (Session::Chess(s), Command::AiMove) => Ok(s.ai_move()),

            (Session::TicTacToe(s), Command::Place { cell }) => s.place(*cell),
            (Session::TicTacToe(s), Command::SetDifficulty { level }) => s.set_difficulty(level),
            (Session::TicTacToe(s), Command::AiMove) => Ok(s.ai_move()),

            (Session::Puzzle2048(s), Command::Slide { direction }) => s.slide(direction, ctx.store),

            (Session::NumberGuesser(s), Command::Guess { value }) => s.guess(value, ctx.store),

            (Session::RockPaperScissors(s), Command::Throw { hand }) => s.throw(hand),

            (Session::MemoryMatch(s), Command::Flip { card }) => s.flip(*card),
            (Session::MemoryMatch(s), Command::Settle) => Ok(s.settle()),

            (Session::Snake(s), Command::Steer { direction }) => s.steer(direction),
            (Session::Snake(s), Command::Tick) => Ok(s.tick(ctx.store)),

            (session, command) => Err(ArcadeError::invalid(format!(
                "{} does not accept '{}'",
                session.kind(),
                command.name()
            ))),
        }
    }
}

/// Everything a host needs to draw a session, tagged with the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum Snapshot {
    Chess(ChessSnapshot),
    TicTacToe(TicTacToeSnapshot),
    #[serde(rename = "2048")]
    Puzzle2048(Puzzle2048Snapshot),
    NumberGuesser(GuesserSnapshot),
    RockPaperScissors(RpsSnapshot),
    MemoryMatch(MemorySnapshot),
    Snake(SnakeSnapshot),
}

impl Snapshot {
    pub fn status(&self) -> &str {
        match self {
            Snapshot::Chess(s) => &s.status,
            Snapshot::TicTacToe(s) => &s.status,
            Snapshot::Puzzle2048(s) => &s.status,
            Snapshot::NumberGuesser(s) => &s.status,
            Snapshot::RockPaperScissors(s) => &s.status,
            Snapshot::MemoryMatch(s) => &s.status,
            Snapshot::Snake(s) => &s.status,
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            Snapshot::Chess(s) => s.phase,
            Snapshot::TicTacToe(s) => s.phase,
            Snapshot::Puzzle2048(s) => s.phase,
            Snapshot::NumberGuesser(s) => s.phase,
            Snapshot::RockPaperScissors(s) => s.phase,
            Snapshot::MemoryMatch(s) => s.phase,
            Snapshot::Snake(s) => s.phase,
        }
    }
}
