//! Error types for the session core

use thiserror::Error;

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors surfaced by the session controller and transport client
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No active session. Start an interview first.")]
    NoActiveSession,

    #[error("No session to save. Start an interview and exchange at least one message.")]
    NothingToSave,

    #[error("Not enough conversation to analyze. Complete at least one exchange first.")]
    NotEnoughTranscript,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        SessionError::Transport(err.to_string())
    }
}
