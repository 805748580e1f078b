#[cfg(feature = "cli")]
pub mod cli;
pub mod lambda;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use lambda::LambdaConfig;
pub use toml_config::ServerConfig;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_bind_address, validate_database_url, validate_range, Validate};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://tinywebdb.db?mode=rwc";
pub const DEFAULT_BIND: &str = "127.0.0.1:8787";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Resolved settings for the local server: command line over file over defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub bind: String,
    pub database_url: String,
    pub max_connections: u32,
    /// 超過此大小的請求 body 會得到 500
    pub max_body_bytes: usize,
}

impl ServerSettings {
    /// `overrides` (usually built from the command line) win over `file`.
    pub fn merge(file: Option<ServerConfig>, overrides: ServerConfig) -> Self {
        let file = file.unwrap_or_default();
        Self {
            bind: overrides
                .server
                .bind
                .or(file.server.bind)
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            database_url: overrides
                .database
                .url
                .or(file.database.url)
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            max_connections: overrides
                .database
                .max_connections
                .or(file.database.max_connections)
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            max_body_bytes: overrides
                .server
                .max_body_bytes
                .or(file.server.max_body_bytes)
                .unwrap_or(DEFAULT_MAX_BODY_BYTES),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self::merge(None, ServerConfig::default())
    }
}

impl ConfigProvider for ServerSettings {
    fn database_url(&self) -> &str {
        &self.database_url
    }

    fn max_connections(&self) -> u32 {
        self.max_connections
    }
}

impl Validate for ServerSettings {
    fn validate(&self) -> Result<()> {
        validate_bind_address("server.bind", &self.bind)?;
        validate_database_url("database.url", &self.database_url)?;
        validate_range("database.max_connections", self.max_connections, 1, 100)?;
        validate_range("server.max_body_bytes", self.max_body_bytes, 1024, 64 * 1024 * 1024)?;
        Ok(())
    }
}
