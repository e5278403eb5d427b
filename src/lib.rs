//! MCP server exposing a ClickHouse analytics database.
//!
//! Serves schema metadata as MCP resources (`db://info`,
//! `table://{tableName}/schema`, `table://{tableName}/sample`) and two tools:
//! `execute-sql` for guarded read-only queries and `natural-language-query`
//! for turning a question into schema context.
//!
//! # Example
//!
//! ```no_run
//! use clickhouse_mcp::{
//!     config::{DatabaseConfig, ServerConfig},
//!     database::ClickHouseClient,
//!     protocol::McpServerBuilder,
//!     server::{McpHandler, ServerStateBuilder},
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Configuration comes from CLICKHOUSE_* environment variables
//!     let config = DatabaseConfig::from_env()?;
//!     let client = Arc::new(ClickHouseClient::new(&config)?);
//!
//!     let state = Arc::new(
//!         ServerStateBuilder::new()
//!             .config(ServerConfig::new(config))
//!             .client(client)
//!             .build()
//!             .map_err(|e| anyhow::anyhow!(e))?,
//!     );
//!
//!     let handler = McpHandler::new(state);
//!     let server = McpServerBuilder::new()
//!         .handler(handler)
//!         .with_tools()
//!         .with_resources()
//!         .build()?;
//!
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod metadata;
pub mod protocol;
pub mod resources;
pub mod security;
pub mod server;
pub mod tools;

pub use config::{DatabaseConfig, DatabaseConfigBuilder, ServerConfig};
pub use database::{ClickHouseClient, ColumnDescriptor, DatabaseClient, Row};
pub use error::{McpError, Result};
pub use metadata::{DatabaseSnapshot, MetadataService};
pub use protocol::{McpServer, McpServerBuilder};
pub use security::ReadOnlyGuard;
pub use server::{McpHandler, ServerState, ServerStateBuilder};
