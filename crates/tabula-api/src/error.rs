//! Error types for the API layer.

use tabula_sql::BuildError;
use thiserror::Error;

/// A request parameter failed its validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid table name {0:?}")]
    TableName(String),

    #[error("illegal field name in {0:?}")]
    Fields(String),

    #[error("invalid id_field {0:?}")]
    IdField(String),

    #[error("invalid id {0:?}")]
    Id(String),

    #[error("invalid ids {0:?}")]
    Ids(String),

    #[error("invalid limit {0:?}")]
    Limit(String),

    #[error("invalid offset {0:?}")]
    Offset(String),

    /// Unknown parameter names never reach SQL.
    #[error("no validator for {0}")]
    NoValidator(String),
}

/// Failures reported by the database collaborator.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Everything a handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Database(#[from] DbError),

    #[error("invalid request body: {0}")]
    Body(String),

    #[error("record {index}: no columns given")]
    EmptyRecord { index: usize },

    #[error("record {index}: {keys} keys != {values} values")]
    RecordShape {
        index: usize,
        keys: usize,
        values: usize,
    },

    /// The statement ran but touched a different number of rows than
    /// the request named.
    #[error("mismatch in rows affected: expected {expected}, got {actual}")]
    RowsAffected { expected: u64, actual: u64 },

    #[error("no matching record")]
    NoMatchingRecord,

    #[error("API not implemented yet")]
    NotImplemented,
}

impl ApiError {
    /// Returns the HTTP status for this error.
    pub const fn status(&self) -> u16 {
        match self {
            Self::NotImplemented => 501,
            _ => 400,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Body(err.to_string())
    }
}

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
