//! Configuration file loading for the arcade.
//!
//! Every field has a default, so a missing `arcade.toml` or a partial one
//! is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tictactoe::Difficulty;

/// Errors that can occur when loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Cosmetic pause before the computer moves, per game, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiDelay {
    #[serde(default = "default_chess_delay")]
    pub chess: u64,
    #[serde(default = "default_tictactoe_delay")]
    pub tictactoe: u64,
}

impl Default for AiDelay {
    fn default() -> Self {
        AiDelay {
            chess: default_chess_delay(),
            tictactoe: default_tictactoe_delay(),
        }
    }
}

fn default_chess_delay() -> u64 {
    200
}

fn default_tictactoe_delay() -> u64 {
    500
}

/// Arcade configuration, read from `arcade.toml` in the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcadeConfig {
    /// Search depth of the chess computer, in plies.
    #[serde(default = "default_chess_depth")]
    pub chess_depth: u8,
    #[serde(default)]
    pub tictactoe_difficulty: Difficulty,
    #[serde(default)]
    pub ai_delay_ms: AiDelay,
    /// Fixed seed for every random choice. Without one, the front-end
    /// draws a seed from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_scores_path")]
    pub scores_path: PathBuf,
}

fn default_chess_depth() -> u8 {
    2
}

fn default_scores_path() -> PathBuf {
    PathBuf::from("arcade-scores.json")
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        ArcadeConfig {
            chess_depth: default_chess_depth(),
            tictactoe_difficulty: Difficulty::default(),
            ai_delay_ms: AiDelay::default(),
            seed: None,
            scores_path: default_scores_path(),
        }
    }
}

impl ArcadeConfig {
    /// Deepest chess search the config accepts.
    pub const MAX_CHESS_DEPTH: u8 = 6;

    /// Loads [`Self::config_path()`], or the defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file exists but cannot be read,
    /// [`ConfigError::Parse`] if it is not valid TOML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::config_path())
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ArcadeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// `arcade.toml` in the current working directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from("arcade.toml")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=Self::MAX_CHESS_DEPTH).contains(&self.chess_depth) {
            return Err(ConfigError::Invalid(format!(
                "chess_depth must be between 1 and {}, got {}",
                Self::MAX_CHESS_DEPTH,
                self.chess_depth
            )));
        }
        Ok(())
    }
}
