//! Database client trait.

use crate::database::result::{ColumnDescriptor, Row};
use crate::error::DbResult;
use async_trait::async_trait;

/// Async client for the analytics database.
///
/// Every consumer receives this as an explicitly constructed, explicitly passed
/// `Arc<dyn DatabaseClient>` so tests can substitute a fake implementation.
/// All operations are single round-trip request/response calls: no retry and no
/// timeout beyond whatever the underlying transport imposes.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// The configured database name.
    fn database(&self) -> &str;

    /// Lists all tables in the configured database.
    async fn list_tables(&self) -> DbResult<Vec<String>>;

    /// Introspects one table's columns via `DESCRIBE TABLE`.
    async fn table_schema(&self, table: &str) -> DbResult<Vec<ColumnDescriptor>>;

    /// Executes a raw SQL query.
    ///
    /// The query text is forwarded to the server unmodified; the result format
    /// is negotiated out of band by the transport.
    async fn run_query(&self, sql: &str) -> DbResult<Vec<Row>>;

    /// Fetches up to `limit` rows from a table, in whatever order the engine
    /// returns for an unordered scan.
    async fn sample(&self, table: &str, limit: u32) -> DbResult<Vec<Row>>;

    /// Releases the underlying connection. Invoked exactly once at shutdown.
    async fn close(&self);
}
