//! Shared configuration and common types for the session service.
//!
//! This crate provides functionality used across all server crates:
//! - Configuration types, loaded from environment variables
//! - Wire-level error response structures

pub mod config;
pub mod types;

pub use config::{
    AppConfig, CacheConfig, ConfigError, DatabaseConfig, JwtConfig, KeyRotationConfig,
    ServerConfig,
};
pub use types::response::ErrorBody;
