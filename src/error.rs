// src/error.rs

//! Unified error handling for the site client.

use std::fmt;

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Broad classification of an [`AppError`].
///
/// Callers use this to tell "could not reach the server" apart from
/// "the server rejected the request".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure, elapsed deadline or an unreadable response body.
    Transport,
    /// The data service answered with an error or an unexpected shape.
    Remote,
    /// Local configuration, persistence or input problems.
    Local,
}

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request deadline elapsed
    #[error("{action} timed out after {secs}s")]
    Timeout { action: String, secs: u64 },

    /// Response body was not JSON
    #[error("Invalid response for {action}: {message}")]
    InvalidBody { action: String, message: String },

    /// The data service reported a logical error
    #[error("{message}")]
    Remote { action: String, message: String },

    /// Response JSON did not match the expected record shape
    #[error("Unexpected {action} payload: {message}")]
    Schema { action: String, message: String },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Session persistence error
    #[error("Session error: {0}")]
    Session(String),
}

impl AppError {
    /// Create a remote (server-reported) error.
    pub fn remote(action: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Remote {
            action: action.into(),
            message: message.to_string(),
        }
    }

    /// Create a payload shape mismatch error.
    pub fn schema(action: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Schema {
            action: action.into(),
            message: message.to_string(),
        }
    }

    /// Create an unreadable body error.
    pub fn invalid_body(action: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::InvalidBody {
            action: action.into(),
            message: message.to_string(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(action: impl Into<String>, secs: u64) -> Self {
        Self::Timeout {
            action: action.into(),
            secs,
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a session error.
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session(message.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(_) | Self::Timeout { .. } | Self::InvalidBody { .. } => {
                ErrorKind::Transport
            }
            Self::Remote { .. } | Self::Schema { .. } => ErrorKind::Remote,
            Self::Io(_)
            | Self::Json(_)
            | Self::Toml(_)
            | Self::Url(_)
            | Self::Config(_)
            | Self::Validation(_)
            | Self::Session(_) => ErrorKind::Local,
        }
    }

    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    pub fn is_remote(&self) -> bool {
        self.kind() == ErrorKind::Remote
    }
}
