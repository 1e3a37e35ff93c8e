//! Error types for the fallible edges of the drill engine.
//!
//! Exercise generation and session transitions never fail; only parsing,
//! speech playback, and login can.

/// Speech playback errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechError {
    #[error("speech playback is not supported on this device")]
    Unsupported,

    #[error("utterance was cancelled")]
    Cancelled,

    #[error("speech backend error: {0}")]
    Backend(String),
}

impl SpeechError {
    /// Cancellation is routine (last request wins); everything else is
    /// worth a warning.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, SpeechError::Cancelled)
    }
}

/// Errors decoding a fetched verb list.
#[derive(Debug, thiserror::Error)]
pub enum VocabularyError {
    #[error("malformed verb list: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("verb entry {index} has an empty {field}")]
    EmptyForm { index: usize, field: &'static str },
}

/// Login failures against the spreadsheet user list.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("{0}")]
    Server(String),

    #[error("user not found")]
    UserNotFound,

    #[error("wrong password")]
    WrongPassword,

    #[error("malformed server response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Invalid drill configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid total rounds: {0} (must be at least 1)")]
    InvalidTotalRounds(u32),

    #[error("Invalid speech rate: {0} (must be greater than 0 and at most 10)")]
    InvalidRate(f32),

    #[error("Invalid pitch: {0} (must be between 0 and 2)")]
    InvalidPitch(f32),

    #[error("Invalid volume: {0} (must be between 0 and 1)")]
    InvalidVolume(f32),

    #[error("Empty locale")]
    EmptyLocale,

    #[error("Configuration must be a JSON object")]
    NotAnObject,

    #[error("Malformed configuration: {0}")]
    Malformed(#[from] serde_json::Error),
}
