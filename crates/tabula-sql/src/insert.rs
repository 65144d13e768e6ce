//! Dynamic single-row INSERT statement builder using the typestate pattern.

use std::marker::PhantomData;

use crate::error::{BuildError, Result};
use crate::ident::check_ident;
use crate::value::{SqlValue, ToSqlValue};

// Typestate markers

/// Marker: No table specified yet.
pub struct NoTable;
/// Marker: Table has been specified.
pub struct HasTable;

/// An INSERT of one row: `INSERT INTO <table> (<cols>) VALUES (?, ...)`.
pub struct Insert<Table> {
    table: String,
    columns: Vec<String>,
    values: Vec<SqlValue>,
    _state: PhantomData<Table>,
}

impl Insert<NoTable> {
    /// Creates a new INSERT builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            table: String::new(),
            columns: Vec::new(),
            values: Vec::new(),
            _state: PhantomData,
        }
    }

    /// Specifies the table to insert into.
    #[must_use]
    pub fn into_table(self, table: &str) -> Insert<HasTable> {
        Insert {
            table: String::from(table),
            columns: self.columns,
            values: self.values,
            _state: PhantomData,
        }
    }
}

impl Default for Insert<NoTable> {
    fn default() -> Self {
        Self::new()
    }
}

impl Insert<HasTable> {
    /// Specifies the columns to insert into.
    #[must_use]
    pub fn columns<S: AsRef<str>>(mut self, cols: &[S]) -> Self {
        self.columns = cols.iter().map(|s| String::from(s.as_ref())).collect();
        self
    }

    /// Specifies the row's values, parallel to the columns.
    #[must_use]
    pub fn values<T: ToSqlValue>(mut self, vals: Vec<T>) -> Self {
        self.values = vals.into_iter().map(ToSqlValue::to_sql_value).collect();
        self
    }

    /// Builds the INSERT statement and returns SQL with parameters.
    ///
    /// # Errors
    ///
    /// Fails on an invalid table or column name, an empty column list, or
    /// a value count that differs from the column count.
    pub fn build(self) -> Result<(String, Vec<SqlValue>)> {
        check_ident(&self.table)?;
        if self.columns.is_empty() {
            return Err(BuildError::NoColumns);
        }
        if self.columns.len() != self.values.len() {
            return Err(BuildError::ColumnCountMismatch {
                columns: self.columns.len(),
                values: self.values.len(),
            });
        }
        for column in &self.columns {
            check_ident(column)?;
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            self.columns.join(", "),
            SqlValue::placeholders(self.values.len())
        );

        Ok((sql, self.values))
    }
}
