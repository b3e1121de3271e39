//! Database connection pool management.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

use session_shared::config::DatabaseConfig;

use crate::InfrastructureError;

const CONNECT_MAX_RETRIES: u32 = 5;

/// Build the Postgres pool, retrying the initial connection so the
/// service survives a database that comes up slightly after it does.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, InfrastructureError> {
    info!(
        "creating database pool with max_connections {}",
        config.max_connections
    );

    let options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(config.connect_timeout))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .test_before_acquire(true);

    let mut last_error = None;
    for attempt in 1..=CONNECT_MAX_RETRIES {
        match options.clone().connect(&config.url).await {
            Ok(pool) => {
                info!("database pool established");
                return Ok(pool);
            }
            Err(e) if attempt < CONNECT_MAX_RETRIES => {
                let wait = Duration::from_secs(attempt as u64);
                warn!(
                    "database connect attempt {}/{} failed: {}; retrying in {:?}",
                    attempt, CONNECT_MAX_RETRIES, e, wait
                );
                tokio::time::sleep(wait).await;
                last_error = Some(e);
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(InfrastructureError::Database(
        last_error.unwrap_or(sqlx::Error::PoolTimedOut),
    ))
}
