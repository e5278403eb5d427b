//! Metadata discovery: table listing, schema introspection, and sample rows.

use crate::database::{ColumnDescriptor, DatabaseClient, Row};
use crate::error::DbResult;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Row cap for sample queries.
pub const SAMPLE_ROW_LIMIT: u32 = 5;

/// Full database metadata: table list plus per-table schemas.
///
/// Built fresh on every request. Consistency between the table list and the
/// per-table schemas is best-effort only: a table created or dropped between
/// the list call and a schema call is a race this layer does not guard against.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseSnapshot {
    pub database: String,
    pub tables: Vec<String>,
    pub schemas: BTreeMap<String, Vec<ColumnDescriptor>>,
}

impl DatabaseSnapshot {
    /// Human-readable summary, one line per table:
    /// `Table "users" has columns: id (UInt64), name (String)`.
    pub fn schema_summary(&self) -> String {
        let mut lines = Vec::with_capacity(self.tables.len());
        for table in &self.tables {
            let columns = self
                .schemas
                .get(table)
                .map(|columns| {
                    columns
                        .iter()
                        .map(|c| format!("{} ({})", c.name, c.data_type))
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            lines.push(format!("Table \"{table}\" has columns: {columns}"));
        }
        lines.join("\n")
    }
}

/// Composes the database client's introspection calls into the unified
/// metadata surface served by resources and the natural-language tool.
#[derive(Clone)]
pub struct MetadataService {
    client: Arc<dyn DatabaseClient>,
}

impl MetadataService {
    pub fn new(client: Arc<dyn DatabaseClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<dyn DatabaseClient> {
        &self.client
    }

    /// Lists tables, then fetches each table's schema strictly sequentially.
    ///
    /// Latency scales linearly with table count. Any per-table failure aborts
    /// the whole call and propagates; no partial snapshot is returned.
    #[instrument(skip(self))]
    pub async fn database_info(&self) -> DbResult<DatabaseSnapshot> {
        let tables = self.client.list_tables().await?;
        debug!("Building snapshot for {} tables", tables.len());

        let mut schemas = BTreeMap::new();
        for table in &tables {
            let columns = self.client.table_schema(table).await?;
            schemas.insert(table.clone(), columns);
        }

        Ok(DatabaseSnapshot {
            database: self.client.database().to_string(),
            tables,
            schemas,
        })
    }

    /// Single schema introspection call for one table.
    #[instrument(skip(self))]
    pub async fn table_schema(&self, table: &str) -> DbResult<Vec<ColumnDescriptor>> {
        self.client.table_schema(table).await
    }

    /// Fixed-size sample with no ordering guarantee.
    #[instrument(skip(self))]
    pub async fn sample_data(&self, table: &str) -> DbResult<Vec<Row>> {
        self.client.sample(table, SAMPLE_ROW_LIMIT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::mock::MockClient;

    #[tokio::test]
    async fn test_snapshot_matches_known_tables() {
        let service = MetadataService::new(Arc::new(MockClient::analytics()));
        let snapshot = service.database_info().await.unwrap();

        assert_eq!(snapshot.database, "analytics");
        assert_eq!(snapshot.tables, vec!["events", "users"]);
        assert_eq!(snapshot.schemas.len(), snapshot.tables.len());
        assert_eq!(
            snapshot.schemas["events"],
            vec![
                ColumnDescriptor::new("id", "UInt64"),
                ColumnDescriptor::new("ts", "DateTime"),
            ]
        );
        assert_eq!(
            snapshot.schemas["users"],
            vec![
                ColumnDescriptor::new("id", "UInt64"),
                ColumnDescriptor::new("name", "String"),
            ]
        );
    }

    #[tokio::test]
    async fn test_snapshot_serialization_shape() {
        let service = MetadataService::new(Arc::new(MockClient::analytics()));
        let snapshot = service.database_info().await.unwrap();

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["database"], "analytics");
        assert_eq!(value["tables"], serde_json::json!(["events", "users"]));
        assert_eq!(
            value["schemas"]["users"],
            serde_json::json!([
                {"name": "id", "type": "UInt64"},
                {"name": "name", "type": "String"}
            ])
        );
    }

    #[tokio::test]
    async fn test_partial_schema_failure_aborts() {
        let client = MockClient::analytics().failing_schema_for("users");
        let service = MetadataService::new(Arc::new(client));
        assert!(service.database_info().await.is_err());
    }

    #[tokio::test]
    async fn test_sample_capped_at_limit() {
        let body = (0..20)
            .map(|i| format!("{{\"id\":{i}}}"))
            .collect::<Vec<_>>()
            .join("\n");
        let client = MockClient::analytics().with_samples("events", &body);
        let service = MetadataService::new(Arc::new(client));

        let rows = service.sample_data("events").await.unwrap();
        assert_eq!(rows.len(), SAMPLE_ROW_LIMIT as usize);
    }

    #[tokio::test]
    async fn test_schema_summary_lines() {
        let service = MetadataService::new(Arc::new(MockClient::analytics()));
        let snapshot = service.database_info().await.unwrap();

        let summary = snapshot.schema_summary();
        assert!(summary.contains("Table \"events\" has columns: id (UInt64), ts (DateTime)"));
        assert!(summary.contains("Table \"users\" has columns: id (UInt64), name (String)"));
    }
}
