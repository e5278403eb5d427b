//! MCP server binary entry point.

use anyhow::Result;
use clickhouse_mcp::{
    config::{DatabaseConfig, ServerConfig},
    database::{ClickHouseClient, DatabaseClient},
    protocol::McpServerBuilder,
    server::{McpHandler, ServerStateBuilder},
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!(
        "Starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    // Configuration must be complete before anything touches the wire.
    let db_config = DatabaseConfig::from_env().map_err(|e| {
        error!("Invalid database configuration: {}", e);
        anyhow::anyhow!(e)
    })?;

    info!(
        "Configured for database '{}' at {}",
        db_config.database, db_config.url
    );

    let client: Arc<dyn DatabaseClient> = Arc::new(ClickHouseClient::new(&db_config)?);

    let state = Arc::new(
        ServerStateBuilder::new()
            .config(ServerConfig::new(db_config))
            .client(Arc::clone(&client))
            .build()
            .map_err(|e| anyhow::anyhow!(e))?,
    );

    info!("Server state initialized with {} tools", state.tools.len());

    let handler = McpHandler::new(state);
    let server = McpServerBuilder::new()
        .handler(handler)
        .name(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .with_tools()
        .with_resources()
        .build()?;

    info!("MCP server ready, waiting for connections...");

    let result = tokio::select! {
        r = server.run() => r,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received, shutting down");
            Ok(())
        }
    };

    client.close().await;

    result?;
    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("clickhouse_mcp=info,warn"));

    // Use JSON format for structured logging to stderr (stdout is for MCP protocol)
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .json()
        .init();
}
