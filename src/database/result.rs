//! Row and column types, and the JSONEachRow decoder.

use crate::error::{DatabaseError, DbResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One column of a table, as reported by `DESCRIBE TABLE`.
///
/// Serialized as `{"name": ..., "type": ...}`, matching both the shape of a
/// ClickHouse `DESCRIBE` row and the shape clients see in schema payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// A result row: column name to loosely-typed value, exactly as decoded from
/// the server's JSON representation.
pub type Row = serde_json::Map<String, Value>;

/// Decode a `JSONEachRow` response body: one JSON object per line.
///
/// An empty body is a valid zero-row result.
pub fn decode_json_each_row(body: &str) -> DbResult<Vec<Row>> {
    let mut rows = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row: Row = serde_json::from_str(line)
            .map_err(|e| DatabaseError::Decode(format!("{e} in line: {line}")))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Pull a named string field out of each row.
///
/// Used for single-column introspection results such as `SHOW TABLES`.
pub fn extract_string_column(rows: &[Row], field: &str) -> DbResult<Vec<String>> {
    rows.iter()
        .map(|row| {
            row.get(field)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    DatabaseError::Decode(format!("missing string field '{field}' in row"))
                })
        })
        .collect()
}
