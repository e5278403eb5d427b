//! Server state management.
//!
//! The database client is an explicitly constructed, explicitly passed
//! dependency rather than process-global state, so tests can build a state
//! around a fake client.

use crate::config::ServerConfig;
use crate::database::DatabaseClient;
use crate::metadata::MetadataService;
use crate::protocol::ClientInfo;
use crate::security::ReadOnlyGuard;
use crate::tools::ToolRegistry;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct ServerState {
    pub config: ServerConfig,
    pub client: Arc<dyn DatabaseClient>,
    pub metadata: MetadataService,
    pub guard: ReadOnlyGuard,
    pub tools: ToolRegistry,
    initialized: AtomicBool,
    client_info: RwLock<Option<ClientInfo>>,
}

impl ServerState {
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn set_initialized(&self, client_info: ClientInfo) {
        *self.client_info.write() = Some(client_info);
        self.initialized.store(true, Ordering::SeqCst);
    }

    pub fn client_info(&self) -> Option<ClientInfo> {
        self.client_info.read().clone()
    }
}

pub struct ServerStateBuilder {
    config: Option<ServerConfig>,
    client: Option<Arc<dyn DatabaseClient>>,
    guard: Option<ReadOnlyGuard>,
}

impl ServerStateBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            client: None,
            guard: None,
        }
    }

    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn client(mut self, client: Arc<dyn DatabaseClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn guard(mut self, guard: ReadOnlyGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn build(self) -> Result<ServerState, &'static str> {
        let config = self.config.ok_or("Config is required")?;
        let client = self.client.ok_or("Database client is required")?;
        let guard = self.guard.unwrap_or_default();

        let metadata = MetadataService::new(Arc::clone(&client));
        let tools = crate::tools::create_registry(Arc::clone(&client), metadata.clone(), guard);

        Ok(ServerState {
            config,
            client,
            metadata,
            guard,
            tools,
            initialized: AtomicBool::new(false),
            client_info: RwLock::new(None),
        })
    }
}

impl Default for ServerStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
