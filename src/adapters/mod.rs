// Adapters layer: concrete implementations for the host environment (database, host event formats, local server).

pub mod function_url;
#[cfg(feature = "cli")]
pub mod server;
pub mod sqlite;
