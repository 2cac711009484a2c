//! WebAssembly bindings for the minigame arcade.
//!
//! The page owns timing and persistence: it waits before sending `ai_move`,
//! sends `tick` for snake on its own timer, and saves `bestScores()` where
//! it likes (e.g. localStorage), handing them back to the constructor on
//! the next visit.
//!
//! # Usage
//!
//! ```javascript
//! import init, { Arcade } from 'arcade-wasm';
//!
//! await init();
//!
//! const arcade = new Arcade(BigInt(Date.now()), null, savedScores);
//! const id = arcade.open("2048");
//! arcade.dispatch(id, { type: "slide", direction: "left" });
//! console.log(arcade.snapshot(id).status);
//! localStorage.setItem("scores", JSON.stringify(arcade.bestScores()));
//! ```

use arcade::{
    ArcadeConfig, ArcadeError, Capabilities, Command, Filter, GameKind, MemoryStore, MoveOutcome,
    ParseGameKindError, SessionId, Snapshot, BEST_2048, NUMBER_GUESS_BEST, SNAKE_HIGH_SCORE,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use wasm_bindgen::prelude::*;

fn js_error(e: impl Display) -> JsError {
    JsError::new(&e.to_string())
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(js_error)
}

fn outcome_name(outcome: MoveOutcome) -> String {
    match outcome {
        MoveOutcome::Applied => "applied".to_string(),
        MoveOutcome::Ignored => "ignored".to_string(),
    }
}

/// Game sessions that can be driven from JavaScript.
#[wasm_bindgen]
pub struct Arcade {
    inner: arcade::Arcade,
}

impl Arcade {
    fn create(
        seed: u64,
        config_toml: Option<&str>,
        scores: HashMap<String, i64>,
    ) -> Result<Arcade, ArcadeError> {
        let config = match config_toml {
            Some(toml) => ArcadeConfig::from_toml(toml)?,
            None => ArcadeConfig::default(),
        };
        Ok(Arcade {
            inner: arcade::Arcade::new(
                config,
                Capabilities::standard(),
                Box::new(MemoryStore::from(scores)),
                seed,
            ),
        })
    }

    fn open_game(&mut self, game: &str) -> Result<u64, ArcadeError> {
        let kind: GameKind = game
            .parse()
            .map_err(|e: ParseGameKindError| ArcadeError::InvalidInput(e.to_string()))?;
        self.inner.open(kind).map(|id| id.0)
    }

    fn delay_ms(&self, id: u64) -> Result<u64, ArcadeError> {
        let delays = self.inner.config().ai_delay_ms;
        Ok(match self.inner.kind(SessionId(id))? {
            GameKind::Chess => delays.chess,
            GameKind::TicTacToe => delays.tictactoe,
            _ => 0,
        })
    }

    fn scores(&self) -> BTreeMap<&'static str, i64> {
        [BEST_2048, SNAKE_HIGH_SCORE, NUMBER_GUESS_BEST]
            .into_iter()
            .filter_map(|key| self.inner.store().get(key).map(|v| (key, v)))
            .collect()
    }
}

#[wasm_bindgen]
impl Arcade {
    /// Creates an arcade. `config` is the text of an `arcade.toml`;
    /// `scores` is an object of saved best scores, or null.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, config: Option<String>, scores: JsValue) -> Result<Arcade, JsError> {
        let scores: HashMap<String, i64> = if scores.is_null() || scores.is_undefined() {
            HashMap::new()
        } else {
            serde_wasm_bindgen::from_value(scores).map_err(js_error)?
        };
        Arcade::create(seed, config.as_deref(), scores).map_err(js_error)
    }

    /// Opens a session by short name ("chess", "2048", "snake", ...) or
    /// catalog id, and returns its id.
    pub fn open(&mut self, game: &str) -> Result<u64, JsError> {
        self.open_game(game).map_err(js_error)
    }

    /// Sends a command object such as `{ type: "place", cell: 4 }`.
    ///
    /// Returns "applied" or "ignored"; malformed input is an error.
    pub fn dispatch(&mut self, id: u64, command: JsValue) -> Result<String, JsError> {
        let command: Command = serde_wasm_bindgen::from_value(command).map_err(js_error)?;
        self.inner
            .dispatch(SessionId(id), &command)
            .map(outcome_name)
            .map_err(js_error)
    }

    /// Like `dispatch`, answering a confirmation prompt with `confirmed`.
    /// The page asks the player first, e.g. before switching chess sides
    /// mid-game.
    #[wasm_bindgen(js_name = dispatchConfirmed)]
    pub fn dispatch_confirmed(
        &mut self,
        id: u64,
        command: JsValue,
        confirmed: bool,
    ) -> Result<String, JsError> {
        let command: Command = serde_wasm_bindgen::from_value(command).map_err(js_error)?;
        let mut answer = |_: &str| confirmed;
        self.inner
            .dispatch_with(SessionId(id), &command, &mut answer)
            .map(outcome_name)
            .map_err(js_error)
    }

    /// The session state, tagged with a `game` field.
    pub fn snapshot(&self, id: u64) -> Result<JsValue, JsError> {
        let snapshot: Snapshot = self.inner.snapshot(SessionId(id)).map_err(js_error)?;
        to_js(&snapshot)
    }

    pub fn close(&mut self, id: u64) -> Result<(), JsError> {
        self.inner.close(SessionId(id)).map_err(js_error)
    }

    /// Milliseconds to wait before sending `ai_move` to this session.
    #[wasm_bindgen(js_name = aiDelay)]
    pub fn ai_delay(&self, id: u64) -> Result<u32, JsError> {
        let ms = self.delay_ms(id).map_err(js_error)?;
        Ok(u32::try_from(ms).unwrap_or(u32::MAX))
    }

    /// Best scores by storage key, for the page to save.
    #[wasm_bindgen(js_name = bestScores)]
    pub fn best_scores(&self) -> Result<JsValue, JsError> {
        to_js(&self.scores())
    }
}

/// The game catalog, optionally narrowed to "arcade", "strategy" or
/// "puzzle".
#[wasm_bindgen]
pub fn catalog(category: Option<String>) -> Result<JsValue, JsError> {
    let filter: Filter = match category {
        Some(c) => c.parse().map_err(js_error)?,
        None => Filter::All,
    };
    let entries: Vec<_> = arcade::catalog::filter(filter).collect();
    to_js(&entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arcade() -> Arcade {
        Arcade::create(5, None, HashMap::new()).unwrap()
    }

    #[test]
    fn opens_by_name_or_id() {
        let mut a = arcade();
        let first = a.open_game("2048").unwrap();
        let second = a.open_game("9").unwrap();
        assert_ne!(first, second);
        assert_eq!(a.inner.kind(SessionId(second)).unwrap(), GameKind::Chess);
        assert!(matches!(
            a.open_game("pinball"),
            Err(ArcadeError::InvalidInput(_))
        ));
        assert!(matches!(
            a.open_game("reaction"),
            Err(ArcadeError::Unsupported(GameKind::ReactionTest))
        ));
    }

    #[test]
    fn config_text_sets_delays() {
        let mut a = Arcade::create(
            1,
            Some("[ai_delay_ms]\nchess = 50\n"),
            HashMap::new(),
        )
        .unwrap();
        let chess = a.open_game("chess").unwrap();
        let snake = a.open_game("snake").unwrap();
        assert_eq!(a.delay_ms(chess).unwrap(), 50);
        assert_eq!(a.delay_ms(snake).unwrap(), 0);
        assert!(Arcade::create(1, Some("chess_depth = 0"), HashMap::new()).is_err());
    }

    #[test]
    fn saved_scores_come_back() {
        let saved = HashMap::from([(BEST_2048.to_string(), 512)]);
        let a = Arcade::create(1, None, saved).unwrap();
        assert_eq!(a.scores(), BTreeMap::from([(BEST_2048, 512)]));
    }
}
