#![allow(dead_code)]

use std::sync::Arc;

use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use tabula_api::{build_dispatcher, ApiConfig, ApiContext, SqliteDatabase};
use tabula_router::{Dispatcher, Method, Request, Response};

/// Number of rows seeded into `widgets`; ids run from 1 to this value.
pub const SEEDED: i64 = 8;

/// An in-memory database holding a seeded `widgets` table and an empty
/// `gadgets` table.
pub async fn setup_db() -> SqliteDatabase {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .unwrap_or_else(|e| panic!("Failed to open database: {e}"));

    sqlx::query("CREATE TABLE widgets (id INTEGER PRIMARY KEY, name TEXT, size INTEGER)")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("CREATE TABLE gadgets (gid INTEGER PRIMARY KEY, label TEXT)")
        .execute(&pool)
        .await
        .unwrap();
    for i in 1..=SEEDED {
        sqlx::query("INSERT INTO widgets (id, name, size) VALUES (?, ?, ?)")
            .bind(i)
            .bind(format!("widget{i}"))
            .bind(i * 10)
            .execute(&pool)
            .await
            .unwrap();
    }

    SqliteDatabase::new(pool)
}

/// A dispatcher over the full API with the given max-records ceiling.
pub async fn api(max_recs: i64) -> (Dispatcher, SqliteDatabase) {
    let db = setup_db().await;
    let config = ApiConfig::default().with_max_recs(max_recs);
    let ctx = Arc::new(ApiContext::new(config, Arc::new(db.clone())));
    let dispatcher = build_dispatcher(ctx).unwrap_or_else(|e| panic!("Failed to wire API: {e}"));
    (dispatcher, db)
}

pub fn json_request(method: Method, target: &str, body: &Value) -> Request {
    Request::new(method, target)
        .header("Content-Type", "application/json")
        .body(body.to_string())
}

pub fn body(res: &Response) -> Value {
    res.json()
        .unwrap_or_else(|e| panic!("Response body is not JSON: {e}: {:?}", res.body_string()))
}

/// Returns the `Message` of an error response, checking its `Code`.
pub fn error_message(res: &Response) -> String {
    let value = body(res);
    assert_eq!(value["Code"], Value::from(res.status), "body: {value}");
    value["Message"]
        .as_str()
        .unwrap_or_else(|| panic!("Missing Message in {value}"))
        .to_string()
}

pub async fn count(db: &SqliteDatabase, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(db.pool())
        .await
        .unwrap()
}
