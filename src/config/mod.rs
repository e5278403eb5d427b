//! Configuration types and builders.
//!
//! All settings come from the environment and are validated eagerly at startup:
//! a missing required variable is a fatal error raised before any database
//! connection is attempted.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::env;

/// Environment variable names for the required connection settings.
pub const ENV_URL: &str = "CLICKHOUSE_URL";
pub const ENV_USER: &str = "CLICKHOUSE_USER";
pub const ENV_PASSWORD: &str = "CLICKHOUSE_PASSWORD";
pub const ENV_DATABASE: &str = "CLICKHOUSE_DATABASE";

/// ClickHouse connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// HTTP endpoint, e.g. `http://localhost:8123`.
    pub url: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// Target database name.
    pub database: String,
}

impl DatabaseConfig {
    pub fn builder() -> DatabaseConfigBuilder {
        DatabaseConfigBuilder::new()
    }

    /// Read and validate the full connection configuration from the environment.
    pub fn from_env() -> Result<Self> {
        DatabaseConfigBuilder::new().from_env()?.build()
    }
}

/// Builder for [`DatabaseConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct DatabaseConfigBuilder {
    url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    database: Option<String>,
}

impl DatabaseConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Populate from environment variables. Every variable is required;
    /// the first missing one aborts with [`ConfigError::EnvNotFound`].
    pub fn from_env(mut self) -> Result<Self> {
        self.url = Some(require_env(ENV_URL)?);
        self.username = Some(require_env(ENV_USER)?);
        self.password = Some(require_env(ENV_PASSWORD)?);
        self.database = Some(require_env(ENV_DATABASE)?);
        Ok(self)
    }

    pub fn build(self) -> Result<DatabaseConfig> {
        let config = DatabaseConfig {
            url: self.url.ok_or(ConfigError::MissingField("url".into()))?,
            username: self
                .username
                .ok_or(ConfigError::MissingField("username".into()))?,
            // An empty password is valid; an unset one is not.
            password: self
                .password
                .ok_or(ConfigError::MissingField("password".into()))?,
            database: self
                .database
                .ok_or(ConfigError::MissingField("database".into()))?,
        };
        config.validate()?;
        Ok(config)
    }
}

impl DatabaseConfig {
    fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "url".into(),
                message: "URL must not be empty".into(),
            }
            .into());
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "url".into(),
                message: format!("expected an http(s) endpoint, got '{}'", self.url).into(),
            }
            .into());
        }
        if self.username.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "username".into(),
                message: "username must not be empty".into(),
            }
            .into());
        }
        if self.database.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database".into(),
                message: "database must not be empty".into(),
            }
            .into());
        }
        Ok(())
    }
}

fn require_env(name: &'static str) -> Result<String> {
    env::var(name).map_err(|_| ConfigError::EnvNotFound(name).into())
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: Cow<'static, str>,
    pub version: Cow<'static, str>,
    pub database: DatabaseConfig,
}

impl ServerConfig {
    pub fn new(database: DatabaseConfig) -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").into(),
            version: env!("CARGO_PKG_VERSION").into(),
            database,
        }
    }

    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }
}
