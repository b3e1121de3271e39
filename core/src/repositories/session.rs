//! Session store trait: TTL-indexed ephemeral storage for cached client
//! metadata, refresh-token records, revocation markers, and rate-limit
//! counters.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::entities::{Client, RefreshTokenRecord};
use crate::errors::DomainResult;

/// Port to the ephemeral store.
///
/// Every operation is atomic with respect to concurrent callers. A cache
/// miss is `Ok(None)`, never an error; transient backend failures surface
/// as errors and are never swallowed here. The caller decides whether an
/// operation is best-effort.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Cached client metadata, if present.
    async fn get_cached_client(&self, client_id: &str) -> DomainResult<Option<Client>>;

    /// Cache client metadata for `ttl`.
    async fn cache_client(&self, client: &Client, ttl: Duration) -> DomainResult<()>;

    /// Persist a refresh-token record under the opaque token string.
    async fn store_refresh_token(
        &self,
        token: &str,
        record: &RefreshTokenRecord,
        ttl: Duration,
    ) -> DomainResult<()>;

    /// Fetch the record for an opaque refresh token.
    async fn get_refresh_token(&self, token: &str) -> DomainResult<Option<RefreshTokenRecord>>;

    /// Delete a refresh-token record.
    async fn delete_refresh_token(&self, token: &str) -> DomainResult<()>;

    /// Write a revocation marker for an access token's `jti`.
    async fn revoke_access_token(&self, jti: &str, ttl: Duration) -> DomainResult<()>;

    /// Whether a revocation marker exists for this `jti`.
    async fn is_access_token_revoked(&self, jti: &str) -> DomainResult<bool>;

    /// Write a revocation marker for a consumed refresh token.
    async fn revoke_refresh_token(&self, token: &str, ttl: Duration) -> DomainResult<()>;

    /// Whether a revocation marker exists for this refresh token.
    async fn is_refresh_token_revoked(&self, token: &str) -> DomainResult<bool>;

    /// Atomically increment the client's fixed-window counter and return
    /// the new count. The window TTL is applied when the counter
    /// transitions from zero to one; a lost TTL self-heals on the next
    /// transition.
    async fn increment_rate_limit(&self, client_id: &str, window: Duration) -> DomainResult<i64>;
}
