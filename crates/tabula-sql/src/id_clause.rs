//! The id filter shared by every statement shape.

use crate::error::Result;
use crate::ident::check_ident;
use crate::value::SqlValue;

/// Which rows an [`IdClause`] selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdFilter {
    /// No filter: every row matches.
    All,
    /// A single id.
    One(i64),
    /// A list of ids, in request order. Repeats are kept.
    Many(Vec<i64>),
}

/// A `WHERE` fragment over an id column plus its bound values.
///
/// Ids are always bound as parameters; only the (validated) column name is
/// part of the SQL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdClause {
    column: String,
    filter: IdFilter,
}

impl IdClause {
    /// A clause matching every row.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            column: String::new(),
            filter: IdFilter::All,
        }
    }

    /// `WHERE column = ?`.
    ///
    /// # Errors
    ///
    /// Fails when `column` is not a valid identifier.
    pub fn one(column: &str, id: i64) -> Result<Self> {
        Ok(Self {
            column: check_ident(column)?.to_string(),
            filter: IdFilter::One(id),
        })
    }

    /// `WHERE column IN (?, ...)`.
    ///
    /// Repeated ids are kept, each with its own placeholder, so they count
    /// towards [`IdClause::id_count`]. An empty list yields [`IdClause::all`].
    ///
    /// # Errors
    ///
    /// Fails when `column` is not a valid identifier.
    pub fn many(column: &str, ids: impl IntoIterator<Item = i64>) -> Result<Self> {
        let column = check_ident(column)?;
        let ids: Vec<i64> = ids.into_iter().collect();
        if ids.is_empty() {
            return Ok(Self::all());
        }
        Ok(Self {
            column: column.to_string(),
            filter: IdFilter::Many(ids),
        })
    }

    /// Builds the clause from an optional single id and an id list.
    ///
    /// A single id takes precedence over the list.
    ///
    /// # Errors
    ///
    /// Fails when `column` is not a valid identifier.
    pub fn from_request(column: &str, id: Option<i64>, ids: &[i64]) -> Result<Self> {
        match id {
            Some(id) => Self::one(column, id),
            None => Self::many(column, ids.iter().copied()),
        }
    }

    /// Returns the filter.
    #[must_use]
    pub const fn filter(&self) -> &IdFilter {
        &self.filter
    }

    /// Returns true if the clause matches every row.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self.filter, IdFilter::All)
    }

    /// Returns how many ids the request named, repeats included.
    #[must_use]
    pub fn id_count(&self) -> usize {
        match &self.filter {
            IdFilter::All => 0,
            IdFilter::One(_) => 1,
            IdFilter::Many(ids) => ids.len(),
        }
    }

    /// Returns the SQL fragment, empty when every row matches.
    #[must_use]
    pub fn sql(&self) -> String {
        match &self.filter {
            IdFilter::All => String::new(),
            IdFilter::One(_) => format!("WHERE {} = ?", self.column),
            IdFilter::Many(ids) => format!(
                "WHERE {} IN ({})",
                self.column,
                SqlValue::placeholders(ids.len())
            ),
        }
    }

    /// Returns the bound values, in placeholder order.
    #[must_use]
    pub fn params(&self) -> Vec<SqlValue> {
        match &self.filter {
            IdFilter::All => vec![],
            IdFilter::One(id) => vec![SqlValue::Int(*id)],
            IdFilter::Many(ids) => ids.iter().copied().map(SqlValue::Int).collect(),
        }
    }

    /// Appends ` <clause>` to `sql` and the bound ids to `params`.
    pub(crate) fn append_to(&self, sql: &mut String, params: &mut Vec<SqlValue>) {
        if self.is_all() {
            return;
        }
        sql.push(' ');
        sql.push_str(&self.sql());
        params.extend(self.params());
    }
}

impl Default for IdClause {
    fn default() -> Self {
        Self::all()
    }
}
