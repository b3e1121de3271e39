//! Ephemeral store (Redis) configuration.

use serde::{Deserialize, Serialize};

use super::{env_or, env_parse_or};

/// Redis connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL.
    pub url: String,

    /// Connection pool size hint.
    pub pool_size: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379/0"),
            pool_size: 10,
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Self {
        Self {
            url: env_or("REDIS_URL", "redis://localhost:6379/0"),
            pool_size: env_parse_or("REDIS_POOL_SIZE", 10),
        }
    }
}
