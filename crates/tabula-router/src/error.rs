//! Error types for routing.

use thiserror::Error;

/// Router-specific errors.
#[derive(Debug, Error)]
pub enum RouterError {
    /// No route matched the request path.
    #[error("no route matched: {method} {path}")]
    NotFound { method: String, path: String },

    /// The path is routed, but not for this verb.
    #[error("method not allowed: {method} for {path}")]
    MethodNotAllowed {
        method: String,
        path: String,
        allowed: Vec<String>,
    },

    /// Invalid path pattern.
    #[error("invalid path pattern: {0}")]
    InvalidPattern(String),

    /// The verb is not one the router knows.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// A handler payload could not be converted to bytes.
    #[error("payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RouterError {
    /// Returns the HTTP status associated with this error.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::MethodNotAllowed { .. } | Self::UnknownMethod(_) => 405,
            Self::InvalidPattern(_) | Self::Serialization(_) => 500,
        }
    }
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
