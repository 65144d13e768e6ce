//! Dynamic UPDATE statement builder using the typestate pattern.

use std::marker::PhantomData;

use crate::error::{BuildError, Result};
use crate::id_clause::IdClause;
use crate::ident::check_ident;
use crate::value::{SqlValue, ToSqlValue};

// Typestate markers

/// Marker: No table specified yet.
pub struct NoTable;
/// Marker: Table has been specified.
pub struct HasTable;
/// Marker: No SET clause specified yet.
pub struct NoSet;
/// Marker: SET clause has been specified.
pub struct HasSet;

/// An UPDATE restricted by an id clause:
/// `UPDATE <table> SET a = ?, b = ? WHERE <id clause>`.
///
/// Set values are bound before the ids.
pub struct Update<Table, Set> {
    table: String,
    columns: Vec<String>,
    values: Vec<SqlValue>,
    filter: IdClause,
    _state: PhantomData<(Table, Set)>,
}

impl Update<NoTable, NoSet> {
    /// Creates a new UPDATE builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            table: String::new(),
            columns: Vec::new(),
            values: Vec::new(),
            filter: IdClause::all(),
            _state: PhantomData,
        }
    }
}

impl Default for Update<NoTable, NoSet> {
    fn default() -> Self {
        Self::new()
    }
}

// Transition: NoTable -> HasTable
impl<Set> Update<NoTable, Set> {
    /// Specifies the table to update.
    #[must_use]
    pub fn table(self, table: &str) -> Update<HasTable, Set> {
        Update {
            table: String::from(table),
            columns: self.columns,
            values: self.values,
            filter: self.filter,
            _state: PhantomData,
        }
    }
}

// Transition: NoSet -> HasSet (requires table)
impl Update<HasTable, NoSet> {
    /// Adds a SET assignment.
    #[must_use]
    pub fn set<T: ToSqlValue>(self, column: &str, value: T) -> Update<HasTable, HasSet> {
        self.set_all(&[column], vec![value])
    }

    /// Sets parallel lists of columns and values.
    #[must_use]
    pub fn set_all<S: AsRef<str>, T: ToSqlValue>(
        self,
        columns: &[S],
        values: Vec<T>,
    ) -> Update<HasTable, HasSet> {
        Update {
            table: self.table,
            columns: columns.iter().map(|c| String::from(c.as_ref())).collect(),
            values: values.into_iter().map(ToSqlValue::to_sql_value).collect(),
            filter: self.filter,
            _state: PhantomData,
        }
    }
}

// Methods available after SET
impl Update<HasTable, HasSet> {
    /// Adds another SET assignment.
    #[must_use]
    pub fn set<T: ToSqlValue>(mut self, column: &str, value: T) -> Self {
        self.columns.push(String::from(column));
        self.values.push(value.to_sql_value());
        self
    }

    /// Restricts the rows by id. Required: an unrestricted update is refused.
    #[must_use]
    pub fn filter(mut self, clause: IdClause) -> Self {
        self.filter = clause;
        self
    }

    /// Builds the UPDATE statement and returns SQL with parameters.
    ///
    /// # Errors
    ///
    /// Fails on an invalid identifier, mismatched column and value counts,
    /// or a clause that matches every row.
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
        if self.filter.is_all() {
            return Err(BuildError::MissingIdFilter("update"));
        }

        let mut set_parts = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            set_parts.push(format!("{} = ?", check_ident(column)?));
        }

        let mut sql = format!("UPDATE {} SET {}", self.table, set_parts.join(", "));
        let mut params = self.values;
        self.filter.append_to(&mut sql, &mut params);

        Ok((sql, params))
    }
}
