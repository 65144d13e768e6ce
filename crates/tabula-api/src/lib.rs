//! # tabula-api
//!
//! A generic REST surface over the tables of a SQLite database: list the
//! tables, and create, read, update or delete rows in any of them.
//!
//! Untrusted path and query values pass through the validators in
//! [`params`] before they reach the statement builders of `tabula_sql`;
//! row data is always bound, never interpolated.
//!
//! ## Endpoints
//!
//! Relative to the configured base path (`/apid` by default):
//!
//! | path | verbs |
//! |---|---|
//! | `/db/_table` | GET |
//! | `/db/_table/{table_name}` | GET, POST, PATCH, DELETE |
//! | `/db/_table/{table_name}/{id}` | GET, PATCH, DELETE |
//! | `/db`, `/db/_schema/...` | answered with 501 |
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use tabula_api::{build_dispatcher, ApiConfig, ApiContext, SqliteDatabase};
//! use tabula_router::Request;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let db = SqliteDatabase::connect("sqlite::memory:", 1).await.unwrap();
//! sqlx::query("CREATE TABLE widgets (id INTEGER PRIMARY KEY, name TEXT)")
//!     .execute(db.pool())
//!     .await
//!     .unwrap();
//!
//! let ctx = Arc::new(ApiContext::new(ApiConfig::default(), Arc::new(db)));
//! let dispatcher = build_dispatcher(ctx).unwrap();
//!
//! let res = dispatcher.dispatch(Request::get("/apid/db/_table")).await;
//! assert_eq!(res.status, 200);
//! assert_eq!(res.body_string().unwrap(), r#"{"Names":["widgets"]}"#);
//! # }
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod params;
pub mod query;
pub mod records;
pub mod server;

pub use api::{build_dispatcher, build_route_table, route_descriptors, API_TABLE};
pub use config::{ApiConfig, ApiContext};
pub use db::{Database, DbRow, ExecOutcome, SqliteDatabase};
pub use error::{ApiError, DbError, Result, ValidationError};
pub use handlers::{ApiHandler, Operation};
pub use params::{ParamResolver, ParamSource, ValidatedParams, Validators};
pub use records::{BodyRecords, KvRecord};
