//! # Infrastructure Layer
//!
//! Concrete implementations of the core repository ports:
//! - **Database**: Postgres credential repository using SQLx
//! - **Cache**: Redis session store for cached clients, refresh-token
//!   records, revocation markers, and rate-limit counters

pub mod cache;
pub mod database;

use session_core::errors::DomainError;
use thiserror::Error;

/// Errors raised inside the infrastructure layer, before they cross the
/// port boundary into the domain.
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Port contract: every backend failure surfaces to the domain as an
/// internal error; the message stays server-side.
impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::Internal {
            message: err.to_string(),
        }
    }
}
