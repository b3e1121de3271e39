//! HTTP server configuration.

use serde::{Deserialize, Serialize};

use super::{env_or, env_parse_or};

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Address to bind the listener to.
    pub host: String,

    /// Port to bind the listener to.
    pub port: u16,

    /// Public base URL used to build discovery documents.
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8080,
            base_url: String::from("http://localhost:8080"),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: env_or("SERVER_HOST", "0.0.0.0"),
            port: env_parse_or("SERVER_PORT", 8080),
            base_url: env_or("BASE_URL", "http://localhost:8080"),
        }
    }

    /// Bind address in `host:port` form.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
