//! Dynamic DELETE statement builder using the typestate pattern.

use std::marker::PhantomData;

use crate::error::{BuildError, Result};
use crate::id_clause::IdClause;
use crate::ident::check_ident;
use crate::value::SqlValue;

// Typestate markers

/// Marker: No table specified yet.
pub struct NoTable;
/// Marker: Table has been specified.
pub struct HasTable;
/// Marker: Table and id clause have been specified.
pub struct HasFilter;

/// A DELETE restricted by an id clause: `DELETE FROM <table> <id clause>`.
///
/// `build()` is only available after `filter()`, and refuses a clause that
/// matches every row.
///
/// ```compile_fail
/// use tabula_sql::Delete;
///
/// // No `build` without a filter.
/// let _ = Delete::new().from("widgets").build();
/// ```
pub struct Delete<State> {
    table: String,
    filter: IdClause,
    _state: PhantomData<State>,
}

impl Delete<NoTable> {
    /// Creates a new DELETE builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            table: String::new(),
            filter: IdClause::all(),
            _state: PhantomData,
        }
    }

    /// Specifies the table to delete from.
    #[must_use]
    pub fn from(self, table: &str) -> Delete<HasTable> {
        Delete {
            table: String::from(table),
            filter: self.filter,
            _state: PhantomData,
        }
    }
}

impl Default for Delete<NoTable> {
    fn default() -> Self {
        Self::new()
    }
}

impl Delete<HasTable> {
    /// Restricts the rows by id.
    #[must_use]
    pub fn filter(self, clause: IdClause) -> Delete<HasFilter> {
        Delete {
            table: self.table,
            filter: clause,
            _state: PhantomData,
        }
    }
}

impl Delete<HasFilter> {
    /// Builds the DELETE statement and returns SQL with parameters.
    ///
    /// # Errors
    ///
    /// Fails on an invalid table name or a clause that matches every row.
    pub fn build(self) -> Result<(String, Vec<SqlValue>)> {
        check_ident(&self.table)?;
        if self.filter.is_all() {
            return Err(BuildError::MissingIdFilter("deletion"));
        }

        let mut sql = format!("DELETE FROM {}", self.table);
        let mut params = vec![];
        self.filter.append_to(&mut sql, &mut params);

        Ok((sql, params))
    }
}
