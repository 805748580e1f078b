use crate::core::ConfigProvider;
use crate::utils::error::{EdgeError, Result};
use crate::utils::validation::{validate_database_url, validate_range, Validate};

pub const DATABASE_URL_VAR: &str = "TINYWEBDB_DATABASE_URL";
pub const MAX_CONNECTIONS_VAR: &str = "TINYWEBDB_MAX_CONNECTIONS";

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL_VAR).ok_or_else(|| EdgeError::Config {
            message: format!("{} environment variable is required", DATABASE_URL_VAR),
        })?;

        let max_connections = match lookup(MAX_CONNECTIONS_VAR) {
            Some(raw) => raw.parse().map_err(|_| EdgeError::InvalidConfigValue {
                field: MAX_CONNECTIONS_VAR.to_string(),
                value: raw.clone(),
                reason: "Expected a positive integer".to_string(),
            })?,
            None => 5,
        };

        Ok(Self {
            database_url,
            max_connections,
        })
    }
}

impl ConfigProvider for LambdaConfig {
    fn database_url(&self) -> &str {
        &self.database_url
    }

    fn max_connections(&self) -> u32 {
        self.max_connections
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        validate_database_url(DATABASE_URL_VAR, &self.database_url)?;
        validate_range(MAX_CONNECTIONS_VAR, self.max_connections, 1, 100)?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}
