//! The table catalogue query.

use crate::value::SqlValue;

/// Returns the query listing user tables of a SQLite database, by name.
///
/// The result has a single `name` column.
#[must_use]
pub fn list_tables() -> (String, Vec<SqlValue>) {
    (
        String::from(
            "SELECT name FROM sqlite_master WHERE type = 'table' \
             AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' ORDER BY name",
        ),
        vec![],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_tables_has_no_params() {
        let (sql, params) = list_tables();
        assert!(sql.starts_with("SELECT name FROM sqlite_master"));
        assert!(sql.contains("ESCAPE '\\'"));
        assert!(params.is_empty());
    }
}
