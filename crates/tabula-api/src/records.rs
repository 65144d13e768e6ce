//! Wire shapes of request and response bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabula_sql::SqlValue;

/// One record as parallel key and value lists.
///
/// Request bodies carry arbitrary JSON values; retrieved records carry
/// text or `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KvRecord {
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub values: Vec<Value>,
}

impl KvRecord {
    pub fn new(keys: Vec<String>, values: Vec<Value>) -> Self {
        Self { keys, values }
    }

    /// Returns the values as bound statement parameters.
    pub fn sql_values(&self) -> Vec<SqlValue> {
        self.values.iter().map(json_to_sql).collect()
    }
}

/// The body of insert and update requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BodyRecords {
    #[serde(default, alias = "Resource")]
    pub records: Vec<KvRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TablesResponse {
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IdsResponse {
    pub ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NumChangedResponse {
    pub num_changed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordsResponse {
    pub records: Vec<KvRecord>,
}

/// Converts a JSON body value to a bound parameter.
///
/// Arrays and objects are stored as their JSON text.
pub fn json_to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Int(i),
            None => n.as_f64().map_or(SqlValue::Null, SqlValue::Float),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => SqlValue::Text(value.to_string()),
    }
}
