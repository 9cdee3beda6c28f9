//! Custom error types for documind

use thiserror::Error;

/// Main error type for documind operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Backend unreachable: {0}")]
    Transport(String),

    #[error("Backend rejected the request: {0}")]
    Rejected(String),

    #[error("No document with id {0} in the corpus")]
    InvalidScope(i64),

    #[error("Document not found: {0}")]
    DocumentNotFound(i64),

    #[error("An answer is already in flight")]
    ConcurrentPending,

    #[error("Question cannot be empty")]
    EmptyInput,

    #[error("No pending answer to settle")]
    NoPendingTurn,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

impl Error {
    /// True for errors that signal misuse of the client contract rather
    /// than a failed backend operation. Callers should report these and
    /// leave state untouched.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Error::InvalidScope(_)
                | Error::DocumentNotFound(_)
                | Error::ConcurrentPending
                | Error::EmptyInput
                | Error::NoPendingTurn
        )
    }
}

/// Result type alias for documind
pub type Result<T> = std::result::Result<T, Error>;
