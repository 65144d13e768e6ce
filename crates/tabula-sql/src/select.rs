//! Dynamic SELECT statement builder using the typestate pattern.

use std::marker::PhantomData;

use crate::error::{BuildError, Result};
use crate::id_clause::IdClause;
use crate::ident::{check_ident, is_valid_field_list};
use crate::value::SqlValue;

// Typestate markers

/// Marker: No table specified yet.
pub struct NoTable;
/// Marker: Table has been specified.
pub struct HasTable;

/// A SELECT over a runtime-named table:
/// `SELECT <fields> FROM <table> [<id clause>] LIMIT <n> OFFSET <m>`.
///
/// `build()` is only available once a table is given.
pub struct Select<Table> {
    fields: String,
    table: String,
    filter: IdClause,
    limit: Option<i64>,
    offset: Option<i64>,
    _state: PhantomData<Table>,
}

impl Select<NoTable> {
    /// Creates a new SELECT builder selecting `*`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fields: String::from("*"),
            table: String::new(),
            filter: IdClause::all(),
            limit: None,
            offset: None,
            _state: PhantomData,
        }
    }

    /// Specifies the table to select from.
    #[must_use]
    pub fn from(self, table: &str) -> Select<HasTable> {
        Select {
            fields: self.fields,
            table: String::from(table),
            filter: self.filter,
            limit: self.limit,
            offset: self.offset,
            _state: PhantomData,
        }
    }
}

impl Default for Select<NoTable> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Table> Select<Table> {
    /// Sets the field list: `*` or comma-separated column names, used verbatim.
    #[must_use]
    pub fn fields(mut self, fields: &str) -> Self {
        self.fields = String::from(fields);
        self
    }

    /// Restricts the rows by id.
    #[must_use]
    pub fn filter(mut self, clause: IdClause) -> Self {
        self.filter = clause;
        self
    }

    /// Sets `LIMIT`.
    #[must_use]
    pub const fn limit(mut self, n: i64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets `OFFSET`.
    #[must_use]
    pub const fn offset(mut self, n: i64) -> Self {
        self.offset = Some(n);
        self
    }
}

impl Select<HasTable> {
    /// Builds the SELECT statement and returns SQL with parameters.
    ///
    /// SQLite only accepts `OFFSET` after `LIMIT`; an offset without a limit
    /// is rendered with `LIMIT -1` (no limit).
    ///
    /// # Errors
    ///
    /// Fails on an invalid field list or table name.
    pub fn build(self) -> Result<(String, Vec<SqlValue>)> {
        if !is_valid_field_list(&self.fields) {
            return Err(BuildError::InvalidFields(self.fields));
        }
        check_ident(&self.table)?;

        let mut sql = format!("SELECT {} FROM {}", self.fields, self.table);
        let mut params = vec![];
        self.filter.append_to(&mut sql, &mut params);

        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}")),
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {offset}")),
            (None, None) => {}
        }

        Ok((sql, params))
    }
}
