use crate::catalog::GameKind;
use crate::config::ConfigError;
use crate::store::StoreError;
use thiserror::Error;

/// Errors surfaced by the dispatcher and the sessions.
///
/// Illegal moves are not errors: they come back as
/// [`MoveOutcome::Ignored`](crate::MoveOutcome::Ignored).
#[derive(Debug, Error)]
pub enum ArcadeError {
    /// Malformed or out-of-range input. The message is meant for the player;
    /// the session is unchanged.
    #[error("{0}")]
    InvalidInput(String),

    /// A collaborator the game needs was not provided.
    #[error("missing capability: {0}")]
    MissingCapability(&'static str),

    /// The game is listed in the catalog but has no headless implementation.
    #[error("{0} cannot be played here")]
    Unsupported(GameKind),

    #[error("no open session with id {0}")]
    UnknownSession(u64),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ArcadeError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ArcadeError::InvalidInput(message.into())
    }
}
