//! MCP tool definitions and registry.

pub mod nlq;
pub mod query;
pub mod registry;

pub use nlq::NaturalLanguageQueryTool;
pub use query::ExecuteSqlTool;
pub use registry::{ToolHandler, ToolRegistry};

use crate::database::DatabaseClient;
use crate::metadata::MetadataService;
use crate::security::ReadOnlyGuard;
use std::sync::Arc;

/// Create and register all tools.
pub fn create_registry(
    client: Arc<dyn DatabaseClient>,
    metadata: MetadataService,
    guard: ReadOnlyGuard,
) -> ToolRegistry {
    let registry = ToolRegistry::new();

    registry.register(ExecuteSqlTool::new(client, guard));
    registry.register(NaturalLanguageQueryTool::new(metadata));

    registry
}
