//! Error types for the speech output chain

use thiserror::Error;

/// Result type alias for voice operations
pub type VoiceResult<T> = Result<T, VoiceError>;

/// Errors that can occur while producing audible speech
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("Audio playback error: {0}")]
    Playback(String),

    #[error("Audio fetch error: {0}")]
    Fetch(String),

    #[error("Audio decode error: {0}")]
    Decode(String),

    #[error("Synthesizer error: {0}")]
    Synth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for VoiceError {
    fn from(err: reqwest::Error) -> Self {
        VoiceError::Fetch(err.to_string())
    }
}
