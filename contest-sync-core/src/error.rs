//! Error types for the contest-sync client.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while talking to the contest-sync backend.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. `error` is the body's `error` field when one was present.
    #[error("Backend returned {status}")]
    Status {
        status: StatusCode,
        error: Option<String>,
    },

    /// 2xx response whose body reported an error instead of the expected data.
    #[error("Backend reported an error: {0}")]
    Reported(String),

    #[error("Malformed response body: {0}")]
    MalformedBody(String),

    #[error("A sync is already in progress")]
    SyncInProgress,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for contest-sync operations.
pub type SessionResult<T> = Result<T, SessionError>;
