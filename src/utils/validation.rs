use crate::utils::error::{EdgeError, Result};
use std::net::SocketAddr;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Only SQLite URLs (`sqlite:` / `sqlite://`) are accepted.
pub fn validate_database_url(field_name: &str, url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(EdgeError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url.to_string(),
            reason: "Database URL cannot be empty".to_string(),
        });
    }

    if !url.starts_with("sqlite:") {
        return Err(EdgeError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url.to_string(),
            reason: "Database URL must use the sqlite: scheme".to_string(),
        });
    }

    if url.contains('\0') {
        return Err(EdgeError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url.to_string(),
            reason: "Database URL contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_bind_address(field_name: &str, addr: &str) -> Result<SocketAddr> {
    addr.parse().map_err(|e| EdgeError::InvalidConfigValue {
        field: field_name.to_string(),
        value: addr.to_string(),
        reason: format!("Invalid socket address: {}", e),
    })
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(EdgeError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
