//! Redis implementation of the session store port.
//!
//! Key layout:
//! - `client:<client_id>` - cached client metadata (JSON)
//! - `refresh_token:<opaque>` - refresh-token record (JSON)
//! - `revoked:jti:<jti>` - access-token revocation marker
//! - `revoked:refresh:<opaque>` - refresh-token revocation marker
//! - `rate_limit:<client_id>` - fixed-window counter

use std::time::Duration;

use async_trait::async_trait;
use tracing::error;

use session_core::domain::entities::{Client, RefreshTokenRecord};
use session_core::errors::DomainResult;
use session_core::repositories::SessionStore;

use super::redis_client::RedisClient;
use crate::InfrastructureError;

const CLIENT_PREFIX: &str = "client:";
const REFRESH_TOKEN_PREFIX: &str = "refresh_token:";
const REVOKED_JTI_PREFIX: &str = "revoked:jti:";
const REVOKED_REFRESH_PREFIX: &str = "revoked:refresh:";
const RATE_LIMIT_PREFIX: &str = "rate_limit:";

/// Session store backed by Redis.
#[derive(Clone)]
pub struct RedisSessionStore {
    client: RedisClient,
}

impl RedisSessionStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, InfrastructureError> {
        match self.client.get(key).await? {
            Some(payload) => {
                let value = serde_json::from_str(&payload).map_err(|e| {
                    error!("corrupt payload under {}: {}", key, e);
                    InfrastructureError::Serialization(e)
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set_json<T: serde::Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), InfrastructureError> {
        let payload = serde_json::to_string(value)?;
        self.client
            .set_with_expiry(key, &payload, ttl.as_secs())
            .await
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get_cached_client(&self, client_id: &str) -> DomainResult<Option<Client>> {
        let key = format!("{}{}", CLIENT_PREFIX, client_id);
        Ok(self.get_json(&key).await?)
    }

    async fn cache_client(&self, client: &Client, ttl: Duration) -> DomainResult<()> {
        let key = format!("{}{}", CLIENT_PREFIX, client.client_id);
        Ok(self.set_json(&key, client, ttl).await?)
    }

    async fn store_refresh_token(
        &self,
        token: &str,
        record: &RefreshTokenRecord,
        ttl: Duration,
    ) -> DomainResult<()> {
        let key = format!("{}{}", REFRESH_TOKEN_PREFIX, token);
        Ok(self.set_json(&key, record, ttl).await?)
    }

    async fn get_refresh_token(&self, token: &str) -> DomainResult<Option<RefreshTokenRecord>> {
        let key = format!("{}{}", REFRESH_TOKEN_PREFIX, token);
        Ok(self.get_json(&key).await?)
    }

    async fn delete_refresh_token(&self, token: &str) -> DomainResult<()> {
        let key = format!("{}{}", REFRESH_TOKEN_PREFIX, token);
        self.client
            .delete(&key)
            .await
            .map_err(InfrastructureError::into)
            .map(|_| ())
    }

    async fn revoke_access_token(&self, jti: &str, ttl: Duration) -> DomainResult<()> {
        let key = format!("{}{}", REVOKED_JTI_PREFIX, jti);
        Ok(self
            .client
            .set_with_expiry(&key, "1", ttl.as_secs().max(1))
            .await?)
    }

    async fn is_access_token_revoked(&self, jti: &str) -> DomainResult<bool> {
        let key = format!("{}{}", REVOKED_JTI_PREFIX, jti);
        Ok(self.client.exists(&key).await?)
    }

    async fn revoke_refresh_token(&self, token: &str, ttl: Duration) -> DomainResult<()> {
        let key = format!("{}{}", REVOKED_REFRESH_PREFIX, token);
        Ok(self
            .client
            .set_with_expiry(&key, "1", ttl.as_secs().max(1))
            .await?)
    }

    async fn is_refresh_token_revoked(&self, token: &str) -> DomainResult<bool> {
        let key = format!("{}{}", REVOKED_REFRESH_PREFIX, token);
        Ok(self.client.exists(&key).await?)
    }

    async fn increment_rate_limit(&self, client_id: &str, window: Duration) -> DomainResult<i64> {
        let key = format!("{}{}", RATE_LIMIT_PREFIX, client_id);
        Ok(self
            .client
            .increment_with_window(&key, window.as_secs())
            .await?)
    }
}
