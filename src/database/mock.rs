//! Recording fake client for tests.

use crate::database::result::{ColumnDescriptor, Row, decode_json_each_row};
use crate::database::traits::DatabaseClient;
use crate::error::{DatabaseError, DbResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// In-memory [`DatabaseClient`] that records every raw query it receives.
pub struct MockClient {
    database: String,
    tables: Vec<String>,
    schemas: BTreeMap<String, Vec<ColumnDescriptor>>,
    samples: BTreeMap<String, Vec<Row>>,
    query_rows: Vec<Row>,
    /// Table name whose schema fetch should fail, for partial-failure tests.
    fail_schema_for: Option<String>,
    executed: Mutex<Vec<String>>,
}

impl MockClient {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            tables: Vec::new(),
            schemas: BTreeMap::new(),
            samples: BTreeMap::new(),
            query_rows: Vec::new(),
            fail_schema_for: None,
            executed: Mutex::new(Vec::new()),
        }
    }

    /// The `analytics` database with `events` and `users` tables used
    /// throughout the test suite.
    pub fn analytics() -> Self {
        Self::new("analytics")
            .with_table(
                "events",
                vec![
                    ColumnDescriptor::new("id", "UInt64"),
                    ColumnDescriptor::new("ts", "DateTime"),
                ],
            )
            .with_table(
                "users",
                vec![
                    ColumnDescriptor::new("id", "UInt64"),
                    ColumnDescriptor::new("name", "String"),
                ],
            )
    }

    pub fn with_table(mut self, name: impl Into<String>, columns: Vec<ColumnDescriptor>) -> Self {
        let name = name.into();
        self.tables.push(name.clone());
        self.schemas.insert(name, columns);
        self
    }

    pub fn with_samples(mut self, table: impl Into<String>, body: &str) -> Self {
        self.samples
            .insert(table.into(), decode_json_each_row(body).unwrap());
        self
    }

    pub fn with_query_rows(mut self, body: &str) -> Self {
        self.query_rows = decode_json_each_row(body).unwrap();
        self
    }

    pub fn failing_schema_for(mut self, table: impl Into<String>) -> Self {
        self.fail_schema_for = Some(table.into());
        self
    }

    /// Raw queries received by `run_query`, in order.
    pub fn executed_queries(&self) -> Vec<String> {
        self.executed.lock().clone()
    }
}

#[async_trait]
impl DatabaseClient for MockClient {
    fn database(&self) -> &str {
        &self.database
    }

    async fn list_tables(&self) -> DbResult<Vec<String>> {
        Ok(self.tables.clone())
    }

    async fn table_schema(&self, table: &str) -> DbResult<Vec<ColumnDescriptor>> {
        if self.fail_schema_for.as_deref() == Some(table) {
            return Err(DatabaseError::QueryFailed(format!(
                "Table analytics.{table} does not exist"
            )));
        }
        self.schemas
            .get(table)
            .cloned()
            .ok_or_else(|| DatabaseError::QueryFailed(format!("unknown table {table}")))
    }

    async fn run_query(&self, sql: &str) -> DbResult<Vec<Row>> {
        self.executed.lock().push(sql.to_string());
        Ok(self.query_rows.clone())
    }

    async fn sample(&self, table: &str, limit: u32) -> DbResult<Vec<Row>> {
        let rows = self.samples.get(table).cloned().unwrap_or_default();
        Ok(rows.into_iter().take(limit as usize).collect())
    }

    async fn close(&self) {}
}
