//! Environment-driven server settings.

use std::env;

/// Runtime settings, read once at startup.
///
/// `DATABASE_URL` is deliberately optional: a till on a counter with no
/// Postgres nearby can still run the server in memory-only mode for
/// development and demos.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// PostgreSQL connection URL; `None` selects the in-memory backend.
    pub database_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let port = port
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port.clone()))?;

        Ok(Self {
            host,
            port,
            database_url: env::var("DATABASE_URL").ok(),
        })
    }

    /// The address the listener binds.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PORT is not a valid port number: {0:?}")]
    InvalidPort(String),
}
