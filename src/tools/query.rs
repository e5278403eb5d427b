//! Raw read-only SQL execution tool.

use crate::database::DatabaseClient;
use crate::error::{McpError, Result, ToolError};
use crate::protocol::{CallToolResult, Tool};
use crate::security::ReadOnlyGuard;
use crate::tools::registry::ToolHandler;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
pub struct ExecuteSqlArgs {
    pub query: String,
}

/// `execute-sql`: guard the query, forward it unmodified, return the rows as
/// pretty-printed JSON text.
pub struct ExecuteSqlTool {
    client: Arc<dyn DatabaseClient>,
    guard: ReadOnlyGuard,
}

impl ExecuteSqlTool {
    pub fn new(client: Arc<dyn DatabaseClient>, guard: ReadOnlyGuard) -> Self {
        Self { client, guard }
    }
}

#[async_trait]
impl ToolHandler for ExecuteSqlTool {
    fn definition(&self) -> Tool {
        Tool {
            name: "execute-sql".into(),
            description: Some(
                "Execute a read-only SQL query against the ClickHouse database \
                and return the result rows as JSON. Queries containing write \
                keywords (INSERT, UPDATE, DELETE, DROP, ALTER, CREATE) are \
                rejected before reaching the database."
                    .into(),
            ),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The SQL query to execute (read-only)"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    #[instrument(skip(self, arguments), fields(tool = "execute-sql"))]
    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: ExecuteSqlArgs = serde_json::from_value(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        // The guard runs before any database call; a rejection never reaches
        // the server.
        self.guard
            .assert_read_only(&args.query)
            .map_err(McpError::from)?;

        debug!("Executing raw query");
        let rows = self
            .client
            .run_query(&args.query)
            .await
            .map_err(McpError::from)?;

        Ok(CallToolResult::json(&rows))
    }
}
