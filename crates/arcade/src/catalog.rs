//! The game catalog shown on the arcade page.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Every game in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    Snake,
    TicTacToe,
    MemoryMatch,
    #[serde(rename = "2048")]
    Puzzle2048,
    RockPaperScissors,
    ColorMatch,
    NumberGuesser,
    ReactionTest,
    Chess,
}

impl GameKind {
    pub const ALL: [GameKind; 9] = [
        GameKind::Snake,
        GameKind::TicTacToe,
        GameKind::MemoryMatch,
        GameKind::Puzzle2048,
        GameKind::RockPaperScissors,
        GameKind::ColorMatch,
        GameKind::NumberGuesser,
        GameKind::ReactionTest,
        GameKind::Chess,
    ];

    /// Whether a session can be opened. The reflex games need a real-time
    /// display and are catalog entries only.
    pub const fn is_playable(self) -> bool {
        !matches!(self, GameKind::ColorMatch | GameKind::ReactionTest)
    }

    pub fn entry(self) -> &'static CatalogEntry {
        // CATALOG is in ALL order.
        &CATALOG[self as usize]
    }

    const fn slug(self) -> &'static str {
        match self {
            GameKind::Snake => "snake",
            GameKind::TicTacToe => "tictactoe",
            GameKind::MemoryMatch => "memory",
            GameKind::Puzzle2048 => "2048",
            GameKind::RockPaperScissors => "rps",
            GameKind::ColorMatch => "colormatch",
            GameKind::NumberGuesser => "guesser",
            GameKind::ReactionTest => "reaction",
            GameKind::Chess => "chess",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entry().name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown game '{0}'")]
pub struct ParseGameKindError(String);

/// Accepts the short names (`chess`, `2048`, `rps`, ...) and catalog ids.
impl FromStr for GameKind {
    type Err = ParseGameKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        GameKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == name || kind.entry().id.to_string() == name)
            .ok_or(ParseGameKindError(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Arcade,
    Strategy,
    Puzzle,
}

/// A catalog filter: everything, or one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Only(Category),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category '{0}', expected all, arcade, strategy or puzzle")]
pub struct ParseFilterError(String);

impl FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "arcade" => Ok(Filter::Only(Category::Arcade)),
            "strategy" => Ok(Filter::Only(Category::Strategy)),
            "puzzle" => Ok(Filter::Only(Category::Puzzle)),
            _ => Err(ParseFilterError(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: u8,
    pub kind: GameKind,
    pub name: &'static str,
    pub description: &'static str,
    pub categories: &'static [Category],
    pub tags: &'static [&'static str],
    pub instructions: &'static str,
}

pub static CATALOG: [CatalogEntry; 9] = [
    CatalogEntry {
        id: 1,
        kind: GameKind::Snake,
        name: "Snake Classic",
        description: "The classic snake game. Eat food and grow longer without hitting walls!",
        categories: &[Category::Arcade],
        tags: &["Arcade", "Classic"],
        instructions: "Use arrow keys to control the snake. Eat food to grow longer. Don't hit walls or yourself!",
    },
    CatalogEntry {
        id: 2,
        kind: GameKind::TicTacToe,
        name: "Tic Tac Toe",
        description: "Classic X and O game. Beat the AI in this strategic battle!",
        categories: &[Category::Strategy],
        tags: &["Strategy", "2 Player"],
        instructions: "Click to place X. Get three in a row to win against our smart AI!",
    },
    CatalogEntry {
        id: 3,
        kind: GameKind::MemoryMatch,
        name: "Memory Match",
        description: "Test your memory with this card matching game. Find all pairs!",
        categories: &[Category::Puzzle],
        tags: &["Memory", "Brain"],
        instructions: "Click cards to flip them. Find matching pairs in as few moves as possible!",
    },
    CatalogEntry {
        id: 4,
        kind: GameKind::Puzzle2048,
        name: "2048 Puzzle",
        description: "Combine tiles to reach 2048. Addictive number puzzle game!",
        categories: &[Category::Puzzle],
        tags: &["Puzzle", "Numbers"],
        instructions: "Use arrow keys to move tiles. Combine same numbers to create 2048!",
    },
    CatalogEntry {
        id: 5,
        kind: GameKind::RockPaperScissors,
        name: "Rock Paper Scissors",
        description: "Classic hand game against the computer. Best of 5 wins!",
        categories: &[Category::Strategy],
        tags: &["Classic", "Quick"],
        instructions: "Choose rock, paper, or scissors. Beat the computer in this classic game!",
    },
    CatalogEntry {
        id: 6,
        kind: GameKind::ColorMatch,
        name: "Color Match",
        description: "Fast-paced color matching game. Test your reflexes!",
        categories: &[Category::Arcade],
        tags: &["Reflex", "Colors"],
        instructions: "Click the color that matches the word, not the text color. Be quick!",
    },
    CatalogEntry {
        id: 7,
        kind: GameKind::NumberGuesser,
        name: "Number Guesser",
        description: "Guess the number in fewest attempts. Can you beat 5 tries?",
        categories: &[Category::Puzzle],
        tags: &["Logic", "Numbers"],
        instructions: "Guess the number between 1-100. We'll tell you if it's higher or lower!",
    },
    CatalogEntry {
        id: 8,
        kind: GameKind::ReactionTest,
        name: "Reaction Test",
        description: "Test your reaction speed. How fast can you click?",
        categories: &[Category::Arcade],
        tags: &["Reflex", "Speed"],
        instructions: "Click the circle as soon as it appears. Test your reaction time!",
    },
    CatalogEntry {
        id: 9,
        kind: GameKind::Chess,
        name: "Chess Master AI",
        description: "Play classic Chess against a Minimax AI. Can you beat the computer?",
        categories: &[Category::Strategy],
        tags: &["Strategy", "Brain"],
        instructions: "Click a piece to select it, then click a valid square to move. Win by checkmating the Black King!",
    },
];

/// Catalog entries passing `by`, in catalog order.
pub fn filter(by: Filter) -> impl Iterator<Item = &'static CatalogEntry> {
    CATALOG.iter().filter(move |entry| match by {
        Filter::All => true,
        Filter::Only(category) => entry.categories.contains(&category),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_in_kind_order() {
        for (i, kind) in GameKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.entry().kind, kind);
            assert_eq!(kind.entry().id as usize, i + 1);
        }
    }

    #[test]
    fn filters_by_category() {
        let names = |f| filter(f).map(|e| e.kind).collect::<Vec<_>>();
        assert_eq!(names(Filter::All).len(), 9);
        assert_eq!(
            names(Filter::Only(Category::Strategy)),
            vec![GameKind::TicTacToe, GameKind::RockPaperScissors, GameKind::Chess]
        );
        assert_eq!(
            names(Filter::Only(Category::Arcade)),
            vec![GameKind::Snake, GameKind::ColorMatch, GameKind::ReactionTest]
        );
        assert_eq!(names(Filter::Only(Category::Puzzle)).len(), 3);
    }

    #[test]
    fn parses_names_and_ids() {
        assert_eq!("chess".parse(), Ok(GameKind::Chess));
        assert_eq!("2048".parse(), Ok(GameKind::Puzzle2048));
        assert_eq!("5".parse(), Ok(GameKind::RockPaperScissors));
        assert_eq!(
            "Pong".parse::<GameKind>().unwrap_err().to_string(),
            "unknown game 'pong'"
        );
        assert_eq!("Puzzle".parse(), Ok(Filter::Only(Category::Puzzle)));
        assert_eq!(
            "racing".parse::<Filter>(),
            Err(ParseFilterError("racing".to_string()))
        );
    }

    #[test]
    fn reflex_games_are_not_playable() {
        let unplayable: Vec<_> = GameKind::ALL.into_iter().filter(|k| !k.is_playable()).collect();
        assert_eq!(unplayable, vec![GameKind::ColorMatch, GameKind::ReactionTest]);
    }
}
