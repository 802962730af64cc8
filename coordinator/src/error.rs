use thiserror::Error;
use types::{AgentError, PlayerId};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("At least {minimum} players are required, got {actual}")]
    TooFewPlayers { minimum: usize, actual: usize },

    #[error("Game was created for {expected} players but {actual} joined")]
    PlayerCountMismatch { expected: usize, actual: usize },

    #[error("Player {0} already joined")]
    DuplicatePlayer(PlayerId),

    #[error("Player ids must be positive, got {0}")]
    InvalidPlayerId(PlayerId),

    #[error("Roles have already been assigned")]
    RolesAlreadyAssigned,

    #[error("Roles have not been assigned yet")]
    RolesNotAssigned,

    #[error("Game has already started")]
    AlreadyStarted,

    #[error("Game has not started yet")]
    NotStarted,

    #[error("Game not found: {0}")]
    UnknownGame(Uuid),

    #[error("Agent setup failed: {0}")]
    Agent(#[from] AgentError),
}
