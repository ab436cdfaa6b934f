use crate::types::{Phase, SessionId};

/// Result type for engine operations
pub type GameResult<T> = Result<T, GameError>;

/// Errors reported by the session engine. None of these are retried
/// internally; the transport layer translates them into protocol envelopes.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum GameError {
    #[error("no usable questions available to start a session")]
    Configuration,

    #[error("unknown session: {0}")]
    NotFound(SessionId),

    #[error("session already exists: {0}")]
    Conflict(SessionId),

    #[error("answers are not accepted in the {phase:?} phase")]
    InvalidState { phase: Phase },

    #[error("participant {0} already answered this question")]
    AlreadyAnswered(String),

    #[error("unknown participant: {0}")]
    UnknownParticipant(String),
}
