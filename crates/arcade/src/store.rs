//! Best-score persistence.
//!
//! Scores are plain integers under string keys. A game reads its best once
//! when a session opens and writes it the moment it improves.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Key for the best 2048 score. Higher is better.
pub const BEST_2048: &str = "2048Best";
/// Key for the best Snake score. Higher is better.
pub const SNAKE_HIGH_SCORE: &str = "snakeHighScore";
/// Key for the fewest Number Guesser attempts. Lower is better.
pub const NUMBER_GUESS_BEST: &str = "numberGuessBest";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access score file: {0}")]
    Io(#[from] std::io::Error),

    #[error("score file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A string-keyed store of scalar scores.
pub trait ScoreStore {
    fn get(&self, key: &str) -> Option<i64>;

    fn set(&mut self, key: &str, value: i64) -> Result<(), StoreError>;
}

/// Scores kept for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scores: HashMap<String, i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl From<HashMap<String, i64>> for MemoryStore {
    fn from(scores: HashMap<String, i64>) -> Self {
        MemoryStore { scores }
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Option<i64> {
        self.scores.get(key).copied()
    }

    fn set(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        self.scores.insert(key.to_string(), value);
        Ok(())
    }
}

/// Scores in a JSON object on disk, rewritten on every change.
///
/// ```
/// use arcade::{JsonFileStore, ScoreStore};
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("scores.json");
///
/// let mut store = JsonFileStore::open(&path).unwrap();
/// store.set("2048Best", 1024).unwrap();
///
/// let reopened = JsonFileStore::open(&path).unwrap();
/// assert_eq!(reopened.get("2048Best"), Some(1024));
/// ```
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    scores: BTreeMap<String, i64>,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file is an empty store; the
    /// file is created on the first write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read, or
    /// [`StoreError::Json`] if it does not hold a JSON object of integers.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let scores = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            BTreeMap::new()
        };
        Ok(JsonFileStore { path, scores })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.scores)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl ScoreStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<i64> {
        self.scores.get(key).copied()
    }

    /// Updates the value in memory, then rewrites the file. If the write
    /// fails the in-memory value is kept.
    fn set(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        self.scores.insert(key.to_string(), value);
        self.write()
    }
}

/// Which way a best score improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Better {
    Higher,
    Lower,
}

/// A game's best score, cached from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestScore {
    key: &'static str,
    better: Better,
    value: Option<i64>,
}

impl BestScore {
    pub fn load(store: &dyn ScoreStore, key: &'static str, better: Better) -> Self {
        BestScore {
            key,
            better,
            value: store.get(key),
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn value(&self) -> Option<i64> {
        self.value
    }

    /// Takes the stored value if it is better than the cached one.
    pub fn refresh(&mut self, store: &dyn ScoreStore) {
        if let Some(stored) = store.get(self.key) {
            if self.beats(stored) {
                self.value = Some(stored);
            }
        }
    }

    pub fn beats(&self, candidate: i64) -> bool {
        match (self.value, self.better) {
            (None, _) => true,
            (Some(best), Better::Higher) => candidate > best,
            (Some(best), Better::Lower) => candidate < best,
        }
    }

    /// Records `candidate` if it improves on the best, writing it through
    /// to `store` at once. A failed write is logged and otherwise ignored.
    /// Returns true on a new best.
    ///
    /// Other sessions may have stored a better value since this one was
    /// loaded, so the stored value is read back first and the candidate has
    /// to beat both.
    pub fn offer(&mut self, store: &mut dyn ScoreStore, candidate: i64) -> bool {
        self.refresh(&*store);
        if !self.beats(candidate) {
            return false;
        }
        self.value = Some(candidate);
        tracing::info!(key = self.key, score = candidate, "new best score");
        if let Err(e) = store.set(self.key, candidate) {
            tracing::warn!(key = self.key, error = %e, "failed to save best score");
        }
        true
    }
}
