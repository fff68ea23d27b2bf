use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
}

/// Server-side settings, read once at startup and passed down explicitly.
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<ServerConfig, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
        Ok(ServerConfig {
            database_url,
            bind_addr,
        })
    }
}

/// Client-side settings. The server URL defaults to a local instance.
pub struct ClientConfig {
    pub server_url: String,
}

impl ClientConfig {
    pub fn from_env() -> ClientConfig {
        let server_url =
            env::var("TASKPAD_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());
        ClientConfig { server_url }
    }
}
