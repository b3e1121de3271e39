//! Configuration module with one sub-module per concern:
//! - `auth` - token signing, lifetimes, and key rotation
//! - `cache` - ephemeral store (Redis) connection
//! - `database` - persistent store (Postgres) connection and pool
//! - `server` - HTTP bind address and public base URL

pub mod auth;
pub mod cache;
pub mod database;
pub mod server;

use std::env;

use thiserror::Error;

pub use auth::{JwtConfig, KeyRotationConfig};
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Complete application configuration combining all sub-configurations.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub jwt: JwtConfig,
    pub rotation: KeyRotationConfig,
}

impl AppConfig {
    /// Load the full configuration from environment variables.
    ///
    /// Fails when the signing key material is missing or does not look
    /// like PEM; every other setting falls back to a development default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt = JwtConfig::from_env()?;

        Ok(Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            cache: CacheConfig::from_env(),
            jwt,
            rotation: KeyRotationConfig::from_env(),
        })
    }
}

/// Configuration loading error.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub(crate) fn env_or(key: &str, default: &str) -> String {
    env::var(key).ok().filter(|v| !v.is_empty()).unwrap_or_else(|| default.to_string())
}

pub(crate) fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
