//! Resource addresses and template matching.
//!
//! Three addressable resources are exposed:
//! - `db://info` — the full database snapshot
//! - `table://{tableName}/schema` — one table's column descriptors
//! - `table://{tableName}/sample` — up to five sample rows

use crate::protocol::{Resource, ResourceTemplate};
use serde_json::Value;

/// Fixed address of the database snapshot resource.
pub const DATABASE_INFO_URI: &str = "db://info";

/// URI template for per-table schema resources.
pub const TABLE_SCHEMA_TEMPLATE: &str = "table://{tableName}/schema";

/// URI template for per-table sample resources.
pub const TABLE_SAMPLE_TEMPLATE: &str = "table://{tableName}/sample";

/// A parsed resource address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRef {
    DatabaseInfo,
    TableSchema(String),
    TableSample(String),
}

impl ResourceRef {
    /// Parse a concrete resource URI. Returns `None` for anything outside the
    /// three advertised address shapes.
    pub fn parse(uri: &str) -> Option<Self> {
        if uri == DATABASE_INFO_URI {
            return Some(Self::DatabaseInfo);
        }

        let rest = uri.strip_prefix("table://")?;
        if let Some(table) = rest.strip_suffix("/schema") {
            if table.is_empty() {
                return None;
            }
            return Some(Self::TableSchema(table.to_string()));
        }
        if let Some(table) = rest.strip_suffix("/sample") {
            if table.is_empty() {
                return None;
            }
            return Some(Self::TableSample(table.to_string()));
        }
        None
    }

    /// The concrete URI for this reference.
    pub fn uri(&self) -> String {
        match self {
            Self::DatabaseInfo => DATABASE_INFO_URI.to_string(),
            Self::TableSchema(table) => schema_uri(table),
            Self::TableSample(table) => sample_uri(table),
        }
    }
}

pub fn schema_uri(table: &str) -> String {
    format!("table://{table}/schema")
}

pub fn sample_uri(table: &str) -> String {
    format!("table://{table}/sample")
}

/// Narrow a template variable to a single string.
///
/// Transports that expand URI templates from repeated query parameters deliver
/// the variable as an array; take its first element in that case.
pub fn narrow_template_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.first().and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// Substitute a `tableName` argument into a URI still carrying the template
/// placeholder, narrowing array-valued arguments first.
pub fn expand_table_uri(uri: &str, arguments: Option<&serde_json::Map<String, Value>>) -> String {
    if !uri.contains("{tableName}") {
        return uri.to_string();
    }
    let table = arguments
        .and_then(|args| args.get("tableName"))
        .and_then(narrow_template_value);
    match table {
        Some(table) => uri.replace("{tableName}", &table),
        None => uri.to_string(),
    }
}

/// The fixed database-info resource descriptor.
pub fn database_info_resource(database: &str) -> Resource {
    Resource {
        uri: DATABASE_INFO_URI.into(),
        name: "database-info".into(),
        description: Some(format!(
            "Tables and schemas of the \"{database}\" database"
        )),
        mime_type: Some("application/json".into()),
    }
}

/// One candidate resource per existing table, for both templates.
pub fn table_resources(tables: &[String]) -> Vec<Resource> {
    let mut resources = Vec::with_capacity(tables.len() * 2);
    for table in tables {
        resources.push(Resource {
            uri: schema_uri(table),
            name: format!("{table} schema"),
            description: Some(format!("Column names and types of \"{table}\"")),
            mime_type: Some("application/json".into()),
        });
        resources.push(Resource {
            uri: sample_uri(table),
            name: format!("{table} sample"),
            description: Some(format!("Up to 5 sample rows from \"{table}\"")),
            mime_type: Some("application/json".into()),
        });
    }
    resources
}

/// The two advertised resource templates.
pub fn resource_templates() -> Vec<ResourceTemplate> {
    vec![
        ResourceTemplate {
            uri_template: TABLE_SCHEMA_TEMPLATE.into(),
            name: "table schema".into(),
            description: Some("Column names and types for one table".into()),
            mime_type: Some("application/json".into()),
        },
        ResourceTemplate {
            uri_template: TABLE_SAMPLE_TEMPLATE.into(),
            name: "table sample".into(),
            description: Some("Up to 5 sample rows from one table".into()),
            mime_type: Some("application/json".into()),
        },
    ]
}
