use crate::config::toml_config::{DatabaseSection, ServerSection};
use crate::config::{ServerConfig, ServerSettings};
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "tinywebdb-edge")]
#[command(about = "TinyWebDB server backed by SQLite")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// SQLite database URL, e.g. sqlite://tinywebdb.db?mode=rwc
    #[arg(long)]
    pub database_url: Option<String>,

    /// Address to listen on
    #[arg(long)]
    pub bind: Option<String>,

    /// Maximum number of pooled database connections
    #[arg(long)]
    pub max_connections: Option<u32>,

    /// Largest accepted request body in bytes
    #[arg(long)]
    pub max_body_bytes: Option<usize>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn resolve(&self) -> Result<ServerSettings> {
        let file = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path.display());
                Some(ServerConfig::from_file(path)?)
            }
            None => None,
        };

        let overrides = ServerConfig {
            server: ServerSection {
                bind: self.bind.clone(),
                max_body_bytes: self.max_body_bytes,
            },
            database: DatabaseSection {
                url: self.database_url.clone(),
                max_connections: self.max_connections,
            },
        };

        Ok(ServerSettings::merge(file, overrides))
    }
}
