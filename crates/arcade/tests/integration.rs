//! Integration tests for the arcade dispatcher.

use arcade::session::chess::ChessSnapshot;
use arcade::session::guesser::GuesserSnapshot;
use arcade::{
    catalog, Arcade, ArcadeConfig, ArcadeError, Capabilities, Command, Filter, GameKind,
    JsonFileStore, MemoryStore, MoveOutcome, Phase, ScoreStore, SessionId, Snapshot,
    NUMBER_GUESS_BEST,
};
use chess_core::Side;
use chess_engine::{Game, Material};
use game_search::Evaluator;
use proptest::prelude::*;
use tictactoe::{Difficulty, Mark, Outcome};

fn arcade_with(config: ArcadeConfig, store: Box<dyn ScoreStore>, seed: u64) -> Arcade {
    Arcade::new(config, Capabilities::standard(), store, seed)
}

fn arcade(seed: u64) -> Arcade {
    arcade_with(ArcadeConfig::default(), Box::new(MemoryStore::new()), seed)
}

fn chess(arcade: &Arcade, id: SessionId) -> ChessSnapshot {
    match arcade.snapshot(id).expect("session is open") {
        Snapshot::Chess(s) => s,
        other => panic!("expected a chess snapshot, got {:?}", other),
    }
}

fn guesser(arcade: &Arcade, id: SessionId) -> GuesserSnapshot {
    match arcade.snapshot(id).expect("session is open") {
        Snapshot::NumberGuesser(s) => s,
        other => panic!("expected a guesser snapshot, got {:?}", other),
    }
}

/// Halves the range after every hint. Returns the attempts used.
fn binary_search(arcade: &mut Arcade, id: SessionId) -> u32 {
    let (mut low, mut high) = (1u32, 100u32);
    loop {
        let guess = (low + high) / 2;
        let outcome = arcade
            .dispatch(id, &Command::Guess { value: guess.to_string() })
            .expect("guess in range");
        assert_eq!(outcome, MoveOutcome::Applied);
        let snap = guesser(arcade, id);
        if snap.status.starts_with("Too low") {
            low = guess + 1;
        } else if snap.status.starts_with("Too high") {
            high = guess - 1;
        } else {
            assert!(snap.status.starts_with("Correct!"), "status: {}", snap.status);
            assert_eq!(snap.phase, Phase::Terminal);
            return snap.attempts;
        }
    }
}

#[test]
fn test_chess_computer_answers_e4_legally() {
    let mut arcade = arcade(11);
    let id = arcade.open(GameKind::Chess).expect("chess opens");

    let outcome = arcade
        .dispatch(id, &Command::Move { uci: "e2e4".into() })
        .unwrap();
    assert_eq!(outcome, MoveOutcome::Applied);
    let snap = chess(&arcade, id);
    assert_eq!(snap.phase, Phase::AwaitingAi);
    assert_eq!(snap.status, "AI is thinking...");

    // Player input is ignored while the computer is to move.
    let early = arcade
        .dispatch(id, &Command::Move { uci: "d2d4".into() })
        .unwrap();
    assert_eq!(early, MoveOutcome::Ignored);

    assert_eq!(arcade.dispatch(id, &Command::AiMove).unwrap(), MoveOutcome::Applied);
    let snap = chess(&arcade, id);
    assert_eq!(snap.phase, Phase::AwaitingHuman);
    let reply = snap.last_move.expect("computer moved");

    let mut replay = Game::new();
    replay.make_move_uci("e2e4").unwrap();
    replay
        .make_move_uci(&reply)
        .unwrap_or_else(|e| panic!("computer reply {} is illegal: {}", reply, e));
    assert_eq!(replay.to_fen(), snap.fen);

    // Black's material balance, counted by hand from the drawn board.
    let recount: i32 = snap
        .board
        .iter()
        .flatten()
        .flatten()
        .map(|&c| {
            let value = match c.to_ascii_lowercase() {
                'p' => 10,
                'n' | 'b' => 30,
                'r' => 50,
                'q' => 90,
                'k' => 900,
                other => panic!("unexpected piece {}", other),
            };
            if c.is_ascii_lowercase() {
                value
            } else {
                -value
            }
        })
        .sum();
    assert_eq!(Material::new(Side::Black).evaluate(replay.position()), recount);
}

#[test]
fn test_chess_click_to_move() {
    let mut arcade = arcade(3);
    let id = arcade.open(GameKind::Chess).unwrap();

    arcade.dispatch(id, &Command::Select { square: "g1".into() }).unwrap();
    let snap = chess(&arcade, id);
    assert_eq!(snap.selected.map(|s| s.to_string()), Some("g1".to_string()));
    assert_eq!(snap.targets.len(), 2);

    arcade.dispatch(id, &Command::Select { square: "f3".into() }).unwrap();
    let snap = chess(&arcade, id);
    assert_eq!(snap.last_move.as_deref(), Some("g1f3"));
    assert_eq!(snap.selected, None);
    assert_eq!(snap.board[5][5], Some('N'));

    let err = arcade
        .dispatch(id, &Command::Select { square: "z9".into() })
        .unwrap_err();
    assert!(matches!(err, ArcadeError::InvalidInput(_)));
}

#[test]
fn test_best_score_only_improves_across_resets() {
    let mut arcade = arcade(5);
    let id = arcade.open(GameKind::NumberGuesser).unwrap();

    let mut fewest = u32::MAX;
    for _ in 0..6 {
        let attempts = binary_search(&mut arcade, id);
        assert!(attempts <= 7, "binary search took {} attempts", attempts);
        fewest = fewest.min(attempts);
        assert_eq!(guesser(&arcade, id).best, Some(i64::from(fewest)));
        arcade.dispatch(id, &Command::Reset).unwrap();
        assert_eq!(guesser(&arcade, id).attempts, 0);
    }
    assert_eq!(arcade.store().get(NUMBER_GUESS_BEST), Some(i64::from(fewest)));
}

/// Guesses 1, 2, 3, ... until correct. Returns the attempts used.
fn count_up(arcade: &mut Arcade, id: SessionId) -> u32 {
    for value in 1..=100u32 {
        arcade
            .dispatch(id, &Command::Guess { value: value.to_string() })
            .expect("guess in range");
        if guesser(arcade, id).phase == Phase::Terminal {
            return guesser(arcade, id).attempts;
        }
    }
    panic!("the secret is between 1 and 100");
}

#[test]
fn test_best_score_survives_a_worse_result_from_another_session() {
    let mut arcade = arcade(0);
    let slow = arcade.open(GameKind::NumberGuesser).unwrap();
    let fast = arcade.open(GameKind::NumberGuesser).unwrap();

    let quick = binary_search(&mut arcade, fast);
    assert_eq!(arcade.store().get(NUMBER_GUESS_BEST), Some(i64::from(quick)));

    let plodding = count_up(&mut arcade, slow);
    let best = i64::from(quick.min(plodding));
    assert_eq!(arcade.store().get(NUMBER_GUESS_BEST), Some(best));
    assert_eq!(guesser(&arcade, slow).best, Some(best));
}

#[test]
fn test_best_scores_persist_in_the_score_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");

    let attempts = {
        let store = JsonFileStore::open(&path).unwrap();
        let mut arcade = arcade_with(ArcadeConfig::default(), Box::new(store), 8);
        let id = arcade.open(GameKind::NumberGuesser).unwrap();
        binary_search(&mut arcade, id)
    };

    let store = JsonFileStore::open(&path).unwrap();
    assert_eq!(store.get(NUMBER_GUESS_BEST), Some(i64::from(attempts)));
    let mut arcade = arcade_with(ArcadeConfig::default(), Box::new(store), 9);
    let id = arcade.open(GameKind::NumberGuesser).unwrap();
    assert_eq!(guesser(&arcade, id).best, Some(i64::from(attempts)));
}

#[test]
fn test_every_catalog_game_opens_or_is_unsupported() {
    let mut arcade = arcade(1);
    assert_eq!(catalog::filter(Filter::All).count(), 9);
    for entry in catalog::filter(Filter::All) {
        match arcade.open(entry.kind) {
            Ok(id) => {
                assert!(entry.kind.is_playable());
                assert_eq!(arcade.kind(id).unwrap(), entry.kind);
                let snap = arcade.snapshot(id).unwrap();
                assert!(!snap.status().is_empty());
                assert_ne!(snap.phase(), Phase::Terminal);
            }
            Err(ArcadeError::Unsupported(kind)) => {
                assert_eq!(kind, entry.kind);
                assert!(!kind.is_playable());
            }
            Err(e) => panic!("{} failed to open: {}", entry.name, e),
        }
    }
    assert_eq!(arcade.sessions().len(), 7);
}

#[test]
fn test_commands_for_other_games_are_rejected() {
    let mut arcade = arcade(2);
    let id = arcade.open(GameKind::Snake).unwrap();
    for cmd in [
        Command::AiMove,
        Command::Guess { value: "5".into() },
        Command::Flip { card: 0 },
    ] {
        let err = arcade.dispatch(id, &cmd).unwrap_err();
        assert!(matches!(err, ArcadeError::InvalidInput(_)), "{:?}", err);
    }
    assert_eq!(arcade.dispatch(id, &Command::Reset).unwrap(), MoveOutcome::Applied);
}

#[test]
fn test_snake_runs_into_the_wall() {
    let mut arcade = arcade(4);
    let id = arcade.open(GameKind::Snake).unwrap();
    assert_eq!(arcade.dispatch(id, &Command::Tick).unwrap(), MoveOutcome::Ignored);

    arcade
        .dispatch(id, &Command::Steer { direction: "ArrowLeft".into() })
        .unwrap();
    let mut ticks = 0;
    while arcade.snapshot(id).unwrap().phase() != Phase::Terminal {
        arcade.dispatch(id, &Command::Tick).unwrap();
        ticks += 1;
        assert!(ticks <= 11, "snake should have hit the left wall");
    }
    assert!(arcade.snapshot(id).unwrap().status().starts_with("Game Over!"));
}

#[test]
fn test_snapshots_serialize_with_a_game_tag() {
    let mut arcade = arcade(6);
    let id = arcade.open(GameKind::Puzzle2048).unwrap();
    let json = serde_json::to_value(arcade.snapshot(id).unwrap()).unwrap();
    assert_eq!(json["game"], "2048");
    assert_eq!(json["phase"], "awaiting_human");
    assert_eq!(json["cells"].as_array().map(Vec::len), Some(16));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_hard_tictactoe_never_loses(choices in prop::collection::vec(0usize..9, 5), seed in any::<u64>()) {
        let config = ArcadeConfig {
            tictactoe_difficulty: Difficulty::Hard,
            ..ArcadeConfig::default()
        };
        let mut arcade = arcade_with(config, Box::new(MemoryStore::new()), seed);
        let id = arcade.open(GameKind::TicTacToe).unwrap();

        for choice in choices {
            let Snapshot::TicTacToe(snap) = arcade.snapshot(id).unwrap() else {
                unreachable!()
            };
            if snap.phase == Phase::Terminal {
                break;
            }
            let empty: Vec<usize> = (0..9).filter(|&c| snap.cells[c].is_none()).collect();
            let cell = empty[choice % empty.len()];
            prop_assert_eq!(arcade.dispatch(id, &Command::Place { cell }).unwrap(), MoveOutcome::Applied);
            arcade.dispatch(id, &Command::AiMove).unwrap();
        }

        let Snapshot::TicTacToe(snap) = arcade.snapshot(id).unwrap() else {
            unreachable!()
        };
        prop_assert_eq!(snap.phase, Phase::Terminal);
        prop_assert!(!matches!(snap.outcome, Outcome::Won { mark: Mark::X, .. }), "X must not win");
    }
}
