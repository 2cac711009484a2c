//! The dispatcher: opens sessions and routes commands to them.

use crate::capabilities::{Capabilities, Confirm};
use crate::catalog::GameKind;
use crate::config::ArcadeConfig;
use crate::error::ArcadeError;
use crate::session::chess::ChessSession;
use crate::session::guesser::GuesserSession;
use crate::session::memory::MemorySession;
use crate::session::puzzle2048::Puzzle2048Session;
use crate::session::rps::RpsSession;
use crate::session::snake::SnakeSession;
use crate::session::tictactoe::TicTacToeSession;
use crate::session::{Context, MoveOutcome, Session, Snapshot};
use crate::store::ScoreStore;
use chess_core::Side;
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A player action, addressed to one session.
///
/// Serialized with a `type` tag, e.g. `{"type":"slide","direction":"left"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Start the game over. Best scores survive.
    Reset,

    /// Chess: click a square.
    Select { square: String },
    /// Chess: a move in UCI notation.
    Move { uci: String },
    /// Chess: play as `side`. Restarts the game.
    ChooseSide { side: Side },
    /// Chess and tic-tac-toe: let the computer move.
    AiMove,

    /// Tic-tac-toe: mark a cell, 0 to 8 row by row.
    Place { cell: usize },
    SetDifficulty { level: String },

    /// 2048.
    Slide { direction: String },

    /// Number guesser.
    Guess { value: String },

    /// Rock paper scissors.
    Throw { hand: String },

    /// Memory match: turn a card, 0 to 15.
    Flip { card: usize },
    /// Memory match: turn a mismatched pair back.
    Settle,

    /// Snake: set the next direction.
    Steer { direction: String },
    /// Snake: advance one cell.
    Tick,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Reset => "reset",
            Command::Select { .. } => "select",
            Command::Move { .. } => "move",
            Command::ChooseSide { .. } => "choose_side",
            Command::AiMove => "ai_move",
            Command::Place { .. } => "place",
            Command::SetDifficulty { .. } => "set_difficulty",
            Command::Slide { .. } => "slide",
            Command::Guess { .. } => "guess",
            Command::Throw { .. } => "throw",
            Command::Flip { .. } => "flip",
            Command::Settle => "settle",
            Command::Steer { .. } => "steer",
            Command::Tick => "tick",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hosts any number of independent game sessions over one score store.
///
/// Every session draws its randomness from a generator seeded off the
/// arcade seed, so the same seed and the same commands replay the same
/// games.
pub struct Arcade {
    config: ArcadeConfig,
    capabilities: Capabilities,
    store: Box<dyn ScoreStore>,
    sessions: HashMap<SessionId, Session>,
    next_id: u64,
    seeds: Xoshiro256PlusPlus,
}

impl Arcade {
    pub fn new(
        config: ArcadeConfig,
        capabilities: Capabilities,
        store: Box<dyn ScoreStore>,
        seed: u64,
    ) -> Self {
        Arcade {
            config,
            capabilities,
            store,
            sessions: HashMap::new(),
            next_id: 1,
            seeds: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &ArcadeConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn ScoreStore {
        self.store.as_ref()
    }

    /// Starts a new session of `kind`.
    ///
    /// Games without a headless implementation are
    /// [`Unsupported`](ArcadeError::Unsupported); chess fails with
    /// [`MissingCapability`](ArcadeError::MissingCapability) when no rules
    /// were provided.
    pub fn open(&mut self, kind: GameKind) -> Result<SessionId, ArcadeError> {
        let seed = self.seeds.next_u64();
        let store = self.store.as_ref();
        let session = match kind {
            GameKind::Chess => {
                let rules = self
                    .capabilities
                    .chess_rules
                    .clone()
                    .ok_or(ArcadeError::MissingCapability("chess rules"))?;
                Session::Chess(ChessSession::new(rules, self.config.chess_depth, seed))
            }
            GameKind::TicTacToe => Session::TicTacToe(TicTacToeSession::new(
                self.config.tictactoe_difficulty,
                seed,
            )),
            GameKind::Puzzle2048 => Session::Puzzle2048(Puzzle2048Session::new(store, seed)),
            GameKind::NumberGuesser => Session::NumberGuesser(GuesserSession::new(store, seed)),
            GameKind::RockPaperScissors => Session::RockPaperScissors(RpsSession::new(seed)),
            GameKind::MemoryMatch => Session::MemoryMatch(MemorySession::new(seed)),
            GameKind::Snake => Session::Snake(SnakeSession::new(store, seed)),
            GameKind::ColorMatch | GameKind::ReactionTest => {
                return Err(ArcadeError::Unsupported(kind))
            }
        };
        let id = SessionId(self.next_id);
        self.next_id += 1;
        self.sessions.insert(id, session);
        tracing::info!(session = %id, game = %kind, "session opened");
        Ok(id)
    }

    /// Applies `command` to session `id`, asking the stored confirmation
    /// prompt when the command needs one.
    pub fn dispatch(&mut self, id: SessionId, command: &Command) -> Result<MoveOutcome, ArcadeError> {
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(ArcadeError::UnknownSession(id.0))?;
        let ctx = Context {
            store: self.store.as_mut(),
            confirm: self.capabilities.confirm.as_deref_mut().map(|c| c as &mut dyn Confirm),
        };
        let outcome = session.handle(command, ctx);
        log_dispatch(id, session, command, &outcome);
        outcome
    }

    /// Like [`dispatch`](Self::dispatch), with a prompt for this one call.
    pub fn dispatch_with(
        &mut self,
        id: SessionId,
        command: &Command,
        confirm: &mut dyn Confirm,
    ) -> Result<MoveOutcome, ArcadeError> {
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(ArcadeError::UnknownSession(id.0))?;
        let ctx = Context {
            store: self.store.as_mut(),
            confirm: Some(confirm),
        };
        let outcome = session.handle(command, ctx);
        log_dispatch(id, session, command, &outcome);
        outcome
    }

    pub fn snapshot(&self, id: SessionId) -> Result<Snapshot, ArcadeError> {
        self.session(id).map(Session::snapshot)
    }

    pub fn kind(&self, id: SessionId) -> Result<GameKind, ArcadeError> {
        self.session(id).map(Session::kind)
    }

    /// Ids of the open sessions, oldest first.
    pub fn sessions(&self) -> Vec<SessionId> {
        let mut ids: Vec<SessionId> = self.sessions.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn close(&mut self, id: SessionId) -> Result<(), ArcadeError> {
        let session = self
            .sessions
            .remove(&id)
            .ok_or(ArcadeError::UnknownSession(id.0))?;
        tracing::info!(session = %id, game = %session.kind(), "session closed");
        Ok(())
    }

    fn session(&self, id: SessionId) -> Result<&Session, ArcadeError> {
        self.sessions
            .get(&id)
            .ok_or(ArcadeError::UnknownSession(id.0))
    }
}

fn log_dispatch(
    id: SessionId,
    session: &Session,
    command: &Command,
    outcome: &Result<MoveOutcome, ArcadeError>,
) {
    match outcome {
        Ok(_) if matches!(command, Command::Reset) => {
            tracing::info!(session = %id, game = %session.kind(), "session reset");
        }
        Ok(outcome) => {
            tracing::trace!(session = %id, command = command.name(), ?outcome, "command handled");
        }
        Err(e) => {
            tracing::debug!(session = %id, command = command.name(), error = %e, "command rejected");
        }
    }
}
