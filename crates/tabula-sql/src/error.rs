//! Statement building errors.

use thiserror::Error;

/// Errors raised while assembling a statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A table or column name failed the identifier rule.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// A field list was neither `*` nor comma-separated identifiers.
    #[error("illegal field list: {0:?}")]
    InvalidFields(String),

    /// Column and value lists differ in length.
    #[error("column count {columns} does not match value count {values}")]
    ColumnCountMismatch { columns: usize, values: usize },

    /// A row with no columns.
    #[error("no columns given")]
    NoColumns,

    /// A mutation without an id filter would touch every row.
    #[error("{0} must specify id or ids")]
    MissingIdFilter(&'static str),
}

/// Result type alias for statement building.
pub type Result<T> = std::result::Result<T, BuildError>;
