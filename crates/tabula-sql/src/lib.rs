//! # tabula-sql
//!
//! Dynamic SQL for tables known only by name at runtime.
//!
//! Statements are built from two kinds of input, kept strictly apart:
//! - literal structure (table, columns, `LIMIT`/`OFFSET`), which is only
//!   ever interpolated after passing the identifier rule or being an integer
//! - values (ids, row data), which are always bound as `?` parameters
//!
//! ## Example
//!
//! ```rust
//! use tabula_sql::{Delete, IdClause, Select, SqlValue};
//!
//! let (sql, params) = Select::new()
//!     .fields("id,name")
//!     .from("widgets")
//!     .filter(IdClause::one("id", 7).unwrap())
//!     .limit(10)
//!     .offset(0)
//!     .build()
//!     .unwrap();
//! assert_eq!(sql, "SELECT id,name FROM widgets WHERE id = ? LIMIT 10 OFFSET 0");
//! assert_eq!(params, vec![SqlValue::Int(7)]);
//!
//! let (sql, params) = Delete::new()
//!     .from("widgets")
//!     .filter(IdClause::many("id", [1, 2, 3]).unwrap())
//!     .build()
//!     .unwrap();
//! assert_eq!(sql, "DELETE FROM widgets WHERE id IN (?, ?, ?)");
//! assert_eq!(params.len(), 3);
//! ```
//!
//! Identifiers are checked again at build time, so a caller that skipped
//! validation still cannot smuggle SQL text into a statement:
//!
//! ```rust
//! use tabula_sql::Select;
//!
//! assert!(Select::new().from("widgets; DROP TABLE widgets").build().is_err());
//! ```

mod delete;
mod error;
mod id_clause;
pub mod ident;
mod insert;
mod select;
mod tables;
mod update;
pub mod value;

pub use delete::Delete;
pub use error::{BuildError, Result};
pub use id_clause::{IdClause, IdFilter};
pub use insert::Insert;
pub use select::Select;
pub use tables::list_tables;
pub use update::Update;
pub use value::{SqlValue, ToSqlValue};
