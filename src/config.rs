//! Server configuration, loaded from environment variables.

use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;
use thiserror::Error;

/// Default listen address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// Default tracing filter, used when `RUST_LOG` is not set either.
pub const DEFAULT_LOG_FILTER: &str = "tictactoe=debug,tower_http=debug";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address the HTTP/WebSocket listener binds to (`BIND_ADDRESS`).
    pub bind_address: SocketAddr,

    /// Fallback `EnvFilter` directives (`LOG_FILTER`).
    pub log_filter: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid bind address {0:?}: {1}")]
    InvalidBindAddress(String, String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let raw_bind_address = vars
            .get("BIND_ADDRESS")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let bind_address = raw_bind_address
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidBindAddress(raw_bind_address.clone(), e.to_string()))?;

        let log_filter = vars
            .get("LOG_FILTER")
            .filter(|s| !s.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Config {
            bind_address,
            log_filter,
        })
    }
}
