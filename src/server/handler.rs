//! MCP request handler implementation.
//!
//! Two failure contracts live here, deliberately asymmetric: resource reads
//! log and propagate their failures as protocol-level errors, while tool calls
//! catch every failure and deliver it as a successful response flagged as an
//! error in-band. Callers of tools must check the flag, not just the text.

use crate::error::{ProtocolError, ProtocolResult};
use crate::protocol::{
    CallToolParams, CallToolResult, Handler, InitializeParams, InitializeResult,
    ListResourceTemplatesResult, ListResourcesResult, ListToolsResult, MCP_VERSION,
    ReadResourceParams, ReadResourceResult, ResourceContent, ResourcesCapability,
    ServerCapabilities, ServerInfo, ToolsCapability,
};
use crate::resources::{
    ResourceRef, database_info_resource, expand_table_uri, resource_templates, table_resources,
};
use crate::server::state::ServerState;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info};

/// MCP request handler that processes protocol messages.
pub struct McpHandler {
    state: Arc<ServerState>,
}

impl McpHandler {
    pub fn new(state: Arc<ServerState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Arc<ServerState> {
        &self.state
    }

    fn json_content<T: Serialize>(uri: &str, data: &T) -> ProtocolResult<ResourceContent> {
        let text = serde_json::to_string_pretty(data)
            .map_err(|e| ProtocolError::InternalError(e.to_string().into()))?;
        Ok(ResourceContent::json_text(uri, text))
    }
}

#[async_trait]
impl Handler for McpHandler {
    async fn initialize(&self, params: InitializeParams) -> ProtocolResult<InitializeResult> {
        info!(
            "Initialize request from {} v{}",
            params.client_info.name, params.client_info.version
        );
        debug!("Client capabilities: {:?}", params.capabilities);

        self.state.set_initialized(params.client_info);

        let capabilities = ServerCapabilities {
            tools: Some(ToolsCapability {
                list_changed: Some(false),
            }),
            resources: Some(ResourcesCapability {
                subscribe: Some(false),
                list_changed: Some(false),
            }),
        };

        let instructions = format!(
            "ClickHouse MCP server for the \"{}\" database. \
            Resources: db://info (full schema snapshot), \
            table://{{tableName}}/schema and table://{{tableName}}/sample per table. \
            Tools: execute-sql (read-only SQL), natural-language-query \
            (schema context for a question).",
            self.state.client.database()
        );

        Ok(InitializeResult {
            protocol_version: MCP_VERSION.into(),
            capabilities,
            server_info: ServerInfo {
                name: self.state.config.name.to_string(),
                version: self.state.config.version.to_string(),
            },
            instructions: Some(instructions),
        })
    }

    async fn initialized(&self) -> ProtocolResult<()> {
        info!("Server initialized successfully");
        Ok(())
    }

    async fn shutdown(&self) -> ProtocolResult<()> {
        info!("Shutdown request received");
        Ok(())
    }

    async fn list_tools(&self) -> ProtocolResult<ListToolsResult> {
        let tools = self.state.tools.list();
        debug!("Listing {} tools", tools.len());

        Ok(ListToolsResult {
            tools,
            next_cursor: None,
        })
    }

    /// The reporting path: failures become successfully-delivered payloads
    /// carrying `isError` and a text beginning `Error: `.
    async fn call_tool(&self, params: CallToolParams) -> ProtocolResult<CallToolResult> {
        debug!("Tool call: {}", params.name);

        match self.state.tools.execute(params).await {
            Ok(result) => Ok(result),
            Err(e) => {
                error!("Tool execution error: {}", e);
                Ok(CallToolResult::error(format!("Error: {}", e)))
            }
        }
    }

    /// The propagating path: failures become JSON-RPC errors.
    async fn list_resources(&self) -> ProtocolResult<ListResourcesResult> {
        let tables = self.state.client.list_tables().await.map_err(|e| {
            error!("Failed to list tables for resources: {}", e);
            ProtocolError::InternalError(e.to_string().into())
        })?;

        let mut resources = vec![database_info_resource(self.state.client.database())];
        resources.extend(table_resources(&tables));

        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
        })
    }

    async fn list_resource_templates(&self) -> ProtocolResult<ListResourceTemplatesResult> {
        Ok(ListResourceTemplatesResult {
            resource_templates: resource_templates(),
            next_cursor: None,
        })
    }

    async fn read_resource(&self, params: ReadResourceParams) -> ProtocolResult<ReadResourceResult> {
        let uri = expand_table_uri(&params.uri, params.arguments.as_ref());
        debug!("Resource read: {}", uri);

        let resource = ResourceRef::parse(&uri)
            .ok_or_else(|| ProtocolError::ResourceNotFound(uri.clone()))?;

        let content = match &resource {
            ResourceRef::DatabaseInfo => {
                let snapshot = self.state.metadata.database_info().await.map_err(|e| {
                    error!("Failed to build database snapshot: {}", e);
                    ProtocolError::InternalError(e.to_string().into())
                })?;
                Self::json_content(&uri, &snapshot)?
            }
            ResourceRef::TableSchema(table) => {
                let columns = self.state.metadata.table_schema(table).await.map_err(|e| {
                    error!("Failed to fetch schema for {}: {}", table, e);
                    ProtocolError::InternalError(e.to_string().into())
                })?;
                Self::json_content(&uri, &columns)?
            }
            ResourceRef::TableSample(table) => {
                let rows = self.state.metadata.sample_data(table).await.map_err(|e| {
                    error!("Failed to fetch sample rows for {}: {}", table, e);
                    ProtocolError::InternalError(e.to_string().into())
                })?;
                Self::json_content(&uri, &rows)?
            }
        };

        Ok(ReadResourceResult {
            contents: vec![content],
        })
    }
}
