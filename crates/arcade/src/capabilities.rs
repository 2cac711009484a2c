//! Collaborators the host hands to the arcade.

use chess_engine::{RuleSet, StandardChess};
use std::fmt;
use std::sync::Arc;

/// A yes/no question put to the player.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Optional collaborators. A game whose collaborator is missing fails with
/// [`ArcadeError::MissingCapability`](crate::ArcadeError::MissingCapability);
/// the other games are unaffected.
#[derive(Default)]
pub struct Capabilities {
    pub chess_rules: Option<Arc<dyn RuleSet>>,
    /// Asked before a mid-game side change restarts chess.
    pub confirm: Option<Box<dyn Confirm>>,
}

impl Capabilities {
    /// Standard chess rules, no confirmation prompt.
    pub fn standard() -> Self {
        Capabilities {
            chess_rules: Some(Arc::new(StandardChess)),
            confirm: None,
        }
    }

    pub fn with_confirm(mut self, confirm: impl Confirm + 'static) -> Self {
        self.confirm = Some(Box::new(confirm));
        self
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("chess_rules", &self.chess_rules.is_some())
            .field("confirm", &self.confirm.is_some())
            .finish()
    }
}
