//! The database collaborator.
//!
//! The API layer talks to storage only through [`Database`]: run a query
//! and get rows back, or run a statement and get its affected-row count and
//! last insert id. [`SqliteDatabase`] implements it over an sqlx pool.

use std::str::FromStr;

use futures::future::BoxFuture;
use futures::FutureExt;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row, Sqlite, SqlitePool, TypeInfo, ValueRef};
use tabula_sql::SqlValue;
use tracing::debug;

use crate::error::DbError;

/// Result type alias for database operations.
pub type DbResult<T> = std::result::Result<T, DbError>;

/// One retrieved row, every column rendered as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbRow {
    pub columns: Vec<String>,
    /// `None` for SQL NULL.
    pub values: Vec<Option<String>>,
}

/// What a non-query statement reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    pub rows_affected: u64,
    pub last_insert_id: i64,
}

/// Executes statements with bound parameters.
///
/// Implementations provide their own connection-level concurrency; the API
/// layer shares one handle between all requests.
pub trait Database: Send + Sync {
    /// Runs a query and returns its rows.
    fn query(&self, sql: String, params: Vec<SqlValue>) -> BoxFuture<'_, DbResult<Vec<DbRow>>>;

    /// Runs a statement and returns its outcome.
    fn execute(&self, sql: String, params: Vec<SqlValue>) -> BoxFuture<'_, DbResult<ExecOutcome>>;
}

/// [`Database`] over an sqlx SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool on `url`, creating the database file if missing.
    pub async fn connect(url: &str, max_connections: u32) -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl Database for SqliteDatabase {
    fn query(&self, sql: String, params: Vec<SqlValue>) -> BoxFuture<'_, DbResult<Vec<DbRow>>> {
        async move {
            debug!(sql = %sql, params = params.len(), "query");
            let mut query = sqlx::query(&sql);
            for value in params {
                query = bind_param(query, value);
            }
            let rows = query.fetch_all(&self.pool).await?;
            rows.iter().map(row_to_text).collect()
        }
        .boxed()
    }

    fn execute(&self, sql: String, params: Vec<SqlValue>) -> BoxFuture<'_, DbResult<ExecOutcome>> {
        async move {
            debug!(sql = %sql, params = params.len(), "execute");
            let mut query = sqlx::query(&sql);
            for value in params {
                query = bind_param(query, value);
            }
            let result = query.execute(&self.pool).await?;
            Ok(ExecOutcome {
                rows_affected: result.rows_affected(),
                last_insert_id: result.last_insert_rowid(),
            })
        }
        .boxed()
    }
}

/// Binds a SqlValue parameter to a raw query.
fn bind_param<'q>(
    query: sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>,
    value: SqlValue,
) -> sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        SqlValue::Null => query.bind(Option::<i64>::None),
        SqlValue::Bool(b) => query.bind(b),
        SqlValue::Int(i) => query.bind(i),
        SqlValue::Float(f) => query.bind(f),
        SqlValue::Text(s) => query.bind(s),
        SqlValue::Blob(b) => query.bind(b),
    }
}

fn row_to_text(row: &SqliteRow) -> DbResult<DbRow> {
    let columns = row.columns().iter().map(|c| c.name().to_string()).collect();
    let values = (0..row.len())
        .map(|index| column_text(row, index))
        .collect::<DbResult<Vec<_>>>()?;
    Ok(DbRow { columns, values })
}

/// Renders one column by its storage class; blobs are decoded lossily.
fn column_text(row: &SqliteRow, index: usize) -> DbResult<Option<String>> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(None);
    }
    let storage = raw.type_info().name().to_string();
    let text = match storage.as_str() {
        "INTEGER" => row.try_get::<i64, _>(index)?.to_string(),
        "REAL" => row.try_get::<f64, _>(index)?.to_string(),
        "BLOB" => String::from_utf8_lossy(&row.try_get::<Vec<u8>, _>(index)?).into_owned(),
        _ => row.try_get::<String, _>(index)?,
    };
    Ok(Some(text))
}
