//! A small arcade of minigames behind one command dispatcher.
//!
//! This crate provides:
//! - [`Arcade`] - opens game sessions and routes [`Command`]s to them
//! - [`catalog`] - the list of games with their descriptions and categories
//! - [`ScoreStore`] - persistent best scores, in memory or in a JSON file
//! - [`ArcadeConfig`] - search depth, difficulty and delays, read from TOML
//! - [`Capabilities`] - chess rules and the confirmation prompt the host supplies
//!
//! Sessions are plain state machines: nothing here sleeps or runs timers.
//! A snapshot in [`Phase::AwaitingAi`] asks the host to send
//! [`Command::AiMove`], and snake advances only on [`Command::Tick`].
//!
//! # Example
//!
//! ```
//! use arcade::{Arcade, ArcadeConfig, Capabilities, Command, GameKind, MemoryStore, Snapshot};
//!
//! let mut arcade = Arcade::new(
//!     ArcadeConfig::default(),
//!     Capabilities::standard(),
//!     Box::new(MemoryStore::new()),
//!     42,
//! );
//! let id = arcade.open(GameKind::TicTacToe).unwrap();
//! arcade.dispatch(id, &Command::Place { cell: 4 }).unwrap();
//! arcade.dispatch(id, &Command::AiMove).unwrap();
//!
//! let Snapshot::TicTacToe(board) = arcade.snapshot(id).unwrap() else {
//!     unreachable!()
//! };
//! assert_eq!(board.cells.iter().flatten().count(), 2);
//! assert_eq!(board.status, "Your turn (X)");
//! ```

mod arcade;
mod capabilities;
pub mod catalog;
mod config;
mod error;
pub mod session;
mod store;

pub use arcade::{Arcade, Command, SessionId};
pub use capabilities::{Capabilities, Confirm};
pub use catalog::{
    Category, CatalogEntry, Filter, GameKind, ParseFilterError, ParseGameKindError,
};
pub use config::{AiDelay, ArcadeConfig, ConfigError};
pub use error::ArcadeError;
pub use session::{MoveOutcome, Phase, Snapshot};
pub use store::{
    BestScore, Better, JsonFileStore, MemoryStore, ScoreStore, StoreError, BEST_2048,
    NUMBER_GUESS_BEST, SNAKE_HIGH_SCORE,
};
