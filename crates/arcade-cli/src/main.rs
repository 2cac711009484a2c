//! Arcade - play the minigames in a terminal.
//!
//! Lists the catalog, or plays one game at a prompt. Settings come from
//! `arcade.toml` and can be overridden on the command line; best scores are
//! kept in a JSON file between runs.

mod input;
mod render;

use anyhow::Context;
use arcade::{
    catalog, Arcade, ArcadeConfig, ArcadeError, Capabilities, Command, Filter, GameKind,
    JsonFileStore, MoveOutcome, Phase, SessionId, Snapshot,
};
use clap::{Parser, Subcommand};
use input::Input;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tictactoe::Difficulty;
use tracing_subscriber::EnvFilter;

/// How long a mismatched memory pair stays face up.
const MISMATCH_DELAY: Duration = Duration::from_millis(1000);

#[derive(Parser)]
#[command(name = "arcade")]
#[command(about = "Minigame arcade: chess, 2048, snake and more")]
struct Cli {
    /// Config file to read instead of arcade.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the games in the catalog
    List {
        /// Only games in this category (arcade, strategy, puzzle)
        #[arg(short, long, default_value = "all")]
        category: Filter,
    },
    /// Play a game
    Play {
        /// Game to play, by short name (chess, 2048, snake, ...) or id
        game: GameKind,
        /// Seed for every random choice
        #[arg(long)]
        seed: Option<u64>,
        /// Chess search depth in plies
        #[arg(short, long)]
        depth: Option<u8>,
        /// Tic-tac-toe difficulty (easy, hard)
        #[arg(long)]
        difficulty: Option<Difficulty>,
        /// Best-score file
        #[arg(long)]
        scores: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ArcadeConfig::load_from(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => ArcadeConfig::load()?,
    };

    match cli.command {
        Commands::List { category } => {
            list(category);
            Ok(())
        }
        Commands::Play {
            game,
            seed,
            depth,
            difficulty,
            scores,
        } => {
            if let Some(seed) = seed {
                config.seed = Some(seed);
            }
            if let Some(depth) = depth {
                config.chess_depth = depth;
            }
            if let Some(difficulty) = difficulty {
                config.tictactoe_difficulty = difficulty;
            }
            if let Some(scores) = scores {
                config.scores_path = scores;
            }
            config.validate()?;
            play(config, game)
        }
    }
}

fn list(category: Filter) {
    for entry in catalog::filter(category) {
        let marker = if entry.kind.is_playable() { "" } else { " (not playable here)" };
        println!("{:>2}  {}{}", entry.id, entry.name, marker);
        println!("    {}", entry.description);
        println!("    [{}]", entry.tags.join(", "));
    }
}

/// Asks on the terminal; anything but yes is a no.
fn confirm_on_stdin(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    let _ = io::stdout().flush();
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

fn play(config: ArcadeConfig, kind: GameKind) -> anyhow::Result<()> {
    let store = JsonFileStore::open(&config.scores_path)
        .with_context(|| format!("failed to open {}", config.scores_path.display()))?;
    let seed = config.seed.unwrap_or_else(rand::random);
    tracing::debug!(seed, game = %kind, "starting");

    let capabilities = Capabilities::standard().with_confirm(confirm_on_stdin);
    let mut arcade = Arcade::new(config, capabilities, Box::new(store), seed);
    let id = arcade.open(kind)?;

    println!("{}", kind);
    println!("{}", kind.entry().instructions);
    println!("{} Type 'new' to restart, 'quit' to leave.", input::help(kind));

    loop {
        let snap = arcade.snapshot(id)?;
        println!("\n{}", render::snapshot(&snap));

        if snap.phase() == Phase::AwaitingAi {
            thread::sleep(ai_delay(arcade.config(), kind));
            arcade.dispatch(id, &Command::AiMove)?;
            continue;
        }
        if let Snapshot::MemoryMatch(memory) = &snap {
            if memory.awaiting_settle {
                thread::sleep(MISMATCH_DELAY);
                arcade.dispatch(id, &Command::Settle)?;
                continue;
            }
        }

        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            break;
        }
        match input::parse(kind, &line) {
            Ok(Input::Quit) => break,
            Ok(Input::Help) => println!("{}", input::help(kind)),
            Ok(Input::Commands(commands)) => run(&mut arcade, id, &commands)?,
            Err(message) => println!("{}", message),
        }
    }

    arcade.close(id)?;
    Ok(())
}

/// Sends `commands` in order, reporting rejected input to the player.
fn run(arcade: &mut Arcade, id: SessionId, commands: &[Command]) -> anyhow::Result<()> {
    for command in commands {
        match arcade.dispatch(id, command) {
            Ok(MoveOutcome::Applied) => {}
            Ok(MoveOutcome::Ignored) => {
                if !matches!(command, Command::Tick) {
                    println!("That does nothing right now.");
                }
            }
            Err(ArcadeError::InvalidInput(message)) => {
                println!("{}", message);
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn ai_delay(config: &ArcadeConfig, kind: GameKind) -> Duration {
    let ms = match kind {
        GameKind::Chess => config.ai_delay_ms.chess,
        GameKind::TicTacToe => config.ai_delay_ms.tictactoe,
        _ => 0,
    };
    Duration::from_millis(ms)
}
