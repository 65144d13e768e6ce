//! Statement execution for the four record operations.
//!
//! Each function turns validated parameters into one statement shape from
//! `tabula_sql`, runs it on the [`Database`], and checks the outcome.

use tabula_sql::ident::is_valid_ident;
use tabula_sql::{list_tables, BuildError, Delete, Insert, Select, Update};
use tracing::debug;

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::params::ValidatedParams;
use crate::records::KvRecord;

/// Returns the names of the user tables.
pub async fn table_names(db: &dyn Database) -> Result<Vec<String>> {
    let (sql, params) = list_tables();
    let rows = db.query(sql, params).await?;
    Ok(rows
        .into_iter()
        .filter_map(|row| row.values.into_iter().next().flatten())
        .collect())
}

/// Selects records by `table_name`, `fields`, id clause, `limit` and
/// `offset`. Finding no row is an error.
pub async fn select_records(db: &dyn Database, params: &ValidatedParams) -> Result<Vec<KvRecord>> {
    let mut select = Select::new()
        .fields(params.fields())
        .from(params.table_name()?)
        .filter(params.id_clause()?);
    if let Some(limit) = params.int("limit")? {
        select = select.limit(limit);
    }
    if let Some(offset) = params.int("offset")? {
        select = select.offset(offset);
    }

    let (sql, values) = select.build()?;
    debug!(sql = %sql, "select");

    let rows = db.query(sql, values).await?;
    if rows.is_empty() {
        return Err(ApiError::NoMatchingRecord);
    }
    Ok(rows
        .into_iter()
        .map(|row| {
            let values = row
                .values
                .into_iter()
                .map(|v| v.map_or(serde_json::Value::Null, serde_json::Value::String))
                .collect();
            KvRecord::new(row.columns, values)
        })
        .collect())
}

/// Checks every record before anything is written: at least one column,
/// equal key and value counts, and identifier keys.
pub fn validate_records(records: &[KvRecord]) -> Result<()> {
    for (index, record) in records.iter().enumerate() {
        if record.keys.is_empty() {
            return Err(ApiError::EmptyRecord { index });
        }
        if record.keys.len() != record.values.len() {
            return Err(ApiError::RecordShape {
                index,
                keys: record.keys.len(),
                values: record.values.len(),
            });
        }
        if let Some(key) = record.keys.iter().find(|k| !is_valid_ident(k)) {
            return Err(BuildError::InvalidIdentifier(key.clone()).into());
        }
    }
    Ok(())
}

/// Inserts each record with its own statement and returns the generated
/// ids in order.
///
/// Statements are not wrapped in a transaction: if a later record fails,
/// earlier ones stay inserted.
pub async fn insert_records(
    db: &dyn Database,
    table: &str,
    records: &[KvRecord],
) -> Result<Vec<i64>> {
    validate_records(records)?;

    let mut ids = Vec::with_capacity(records.len());
    for record in records {
        let (sql, values) = Insert::new()
            .into_table(table)
            .columns(&record.keys)
            .values(record.sql_values())
            .build()?;
        debug!(sql = %sql, "insert");
        let outcome = db.execute(sql, values).await?;
        ids.push(outcome.last_insert_id);
    }
    Ok(ids)
}

/// Updates the rows named by the id clause with one record's values.
pub async fn update_records(
    db: &dyn Database,
    params: &ValidatedParams,
    record: &KvRecord,
) -> Result<u64> {
    validate_records(std::slice::from_ref(record))?;
    let clause = params.id_clause()?;
    let expected = clause.id_count();

    let (sql, values) = Update::new()
        .table(params.table_name()?)
        .set_all(&record.keys, record.sql_values())
        .filter(clause)
        .build()?;
    debug!(sql = %sql, "update");

    let outcome = db.execute(sql, values).await?;
    check_rows_affected(expected, outcome.rows_affected)
}

/// Deletes the rows named by the id clause.
pub async fn delete_records(db: &dyn Database, params: &ValidatedParams) -> Result<u64> {
    let clause = params.id_clause()?;
    let expected = clause.id_count();

    let (sql, values) = Delete::new()
        .from(params.table_name()?)
        .filter(clause)
        .build()?;
    debug!(sql = %sql, "delete");

    let outcome = db.execute(sql, values).await?;
    check_rows_affected(expected, outcome.rows_affected)
}

/// A mutation must touch exactly as many rows as ids it named.
fn check_rows_affected(expected: usize, actual: u64) -> Result<u64> {
    let expected = expected as u64;
    if actual == expected {
        Ok(actual)
    } else {
        Err(ApiError::RowsAffected { expected, actual })
    }
}
