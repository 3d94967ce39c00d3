//! Error taxonomy shared by the relay client, repository and coordinator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A failed fetch through the proxy relay.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Network, DNS or connection failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx response or a malformed relay envelope.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The embedded payload was not valid JSON of the expected shape.
    #[error("parse error: {0}")]
    Parse(String),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Transport(_) => ErrorKind::Transport,
            FetchError::Protocol(_) => ErrorKind::Protocol,
            FetchError::Parse(_) => ErrorKind::Parse,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

/// User input rejected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Code is required")]
    MissingCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Transport,
    Protocol,
    Parse,
}

/// Error surfaced to the result panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&FetchError> for ErrorInfo {
    fn from(err: &FetchError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
