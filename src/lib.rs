pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{LambdaConfig, ServerSettings};

pub use crate::adapters::sqlite::{connect_pool, SqlStorage};
pub use crate::app::TinyWebDb;
pub use crate::core::bridge::RequestBridge;
pub use crate::core::worker::{fetch, Env};
pub use crate::domain::model::{HttpRequest, HttpResponse, StoredData};
pub use crate::domain::ports::{Application, StoragePort};
pub use crate::utils::error::{EdgeError, Result};
