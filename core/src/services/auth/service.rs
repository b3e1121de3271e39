//! The token service: the grant state machine.
//!
//! Single entry point for the three grants (`client_credentials`,
//! `provision_user`, `refresh_token`). All grants are pinned to the tenant
//! taken from the request path; access tokens are always user-and-tenant
//! scoped, there are no client-only tokens.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, warn};

use crate::domain::entities::{Client, RefreshTokenRecord, TokenResponse, TokenSubject, User};
use crate::domain::entities::token::TOKEN_TYPE_BEARER;
use crate::domain::value_objects::grant::{
    GRANT_CLIENT_CREDENTIALS, GRANT_PROVISION_USER, GRANT_REFRESH_TOKEN,
};
use crate::domain::value_objects::GrantRequest;
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::{CredentialRepository, SessionStore};

use super::rate_limiter::RateLimiter;
use crate::services::token::{TokenConfig, TokenGenerator};

/// Fixed rate-limit window applied to every grant.
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

/// How long resolved client records stay in the session-store cache.
const CLIENT_CACHE_TTL: Duration = Duration::from_secs(15 * 60);

/// Orchestrates credential checks, rate limiting, user state, and token
/// minting for all grants.
pub struct TokenService<C, S>
where
    C: CredentialRepository,
    S: SessionStore,
{
    credentials: Arc<C>,
    sessions: Arc<S>,
    generator: TokenGenerator,
    rate_limiter: RateLimiter<S>,
    config: TokenConfig,
}

impl<C, S> TokenService<C, S>
where
    C: CredentialRepository,
    S: SessionStore,
{
    pub fn new(
        credentials: Arc<C>,
        sessions: Arc<S>,
        generator: TokenGenerator,
        config: TokenConfig,
    ) -> Self {
        let rate_limiter = RateLimiter::new(Arc::clone(&sessions));
        Self {
            credentials,
            sessions,
            generator,
            rate_limiter,
            config,
        }
    }

    /// Handle a token request for the tenant named in the path, branching
    /// on the grant type.
    pub async fn issue(&self, tenant_id: &str, request: &GrantRequest) -> DomainResult<TokenResponse> {
        match request.grant_type.as_str() {
            GRANT_CLIENT_CREDENTIALS => self.client_credentials(tenant_id, request).await,
            GRANT_PROVISION_USER => self.provision_user(tenant_id, request).await,
            GRANT_REFRESH_TOKEN => self.refresh(tenant_id, &request.refresh_token).await,
            _ => Err(AuthError::InvalidGrant.into()),
        }
    }

    /// `client_credentials`: authenticate an already-provisioned user.
    ///
    /// The user must exist and belong to the path tenant; callers that
    /// need to create or update a user go through `provision_user`.
    async fn client_credentials(
        &self,
        tenant_id: &str,
        request: &GrantRequest,
    ) -> DomainResult<TokenResponse> {
        let client = self
            .authenticate_client(&request.client_id, &request.client_secret)
            .await?;
        self.enforce_rate_limit(&client).await?;

        if request.user_id.is_empty() {
            return Err(AuthError::InvalidRequest.into());
        }
        self.ensure_tenant_exists(tenant_id).await?;

        let user = match self.credentials.get_user(&request.user_id).await? {
            Some(user) => user,
            None => {
                warn!(
                    "user {} does not exist; first-time login must use provision_user",
                    request.user_id
                );
                return Err(AuthError::InvalidRequest.into());
            }
        };

        if user.tenant_id != tenant_id {
            warn!(
                "user {} belongs to tenant {}, not request tenant {}",
                user.id, user.tenant_id, tenant_id
            );
            return Err(AuthError::InvalidRequest.into());
        }

        let roles = self.credentials.get_user_roles(&request.user_id).await?;
        let subject = TokenSubject::new(request.user_id.clone(), tenant_id, roles);

        self.issue_pair(&client, subject).await
    }

    /// `provision_user`: first-time login or profile update.
    ///
    /// Inserts or fully overwrites the user row; a non-blank `user_roles`
    /// value atomically replaces the role set, a blank one leaves the
    /// existing roles in place.
    async fn provision_user(
        &self,
        tenant_id: &str,
        request: &GrantRequest,
    ) -> DomainResult<TokenResponse> {
        let client = self
            .authenticate_client(&request.client_id, &request.client_secret)
            .await?;
        self.enforce_rate_limit(&client).await?;

        if request.user_id.is_empty() {
            return Err(AuthError::InvalidRequest.into());
        }
        if request.user_full_name.is_empty() || request.user_phone.is_empty() {
            warn!(
                "provision_user for {} is missing required user details",
                request.user_id
            );
            return Err(AuthError::InvalidRequest.into());
        }
        self.ensure_tenant_exists(tenant_id).await?;

        let roles = parse_roles(&request.user_roles);
        let user = User::from_form(
            request.user_id.clone(),
            tenant_id,
            request.user_full_name.clone(),
            request.user_phone.clone(),
            &request.user_email,
        );

        self.credentials
            .upsert_user_with_roles(&user, roles.as_deref())
            .await?;

        let roles = match roles {
            Some(roles) => roles,
            None => self.credentials.get_user_roles(&request.user_id).await?,
        };
        let subject = TokenSubject::new(request.user_id.clone(), tenant_id, roles);

        self.issue_pair(&client, subject).await
    }

    /// `refresh_token`: single-use rotation with subject carry-through.
    ///
    /// The revocation marker is written before the record is deleted so a
    /// racing second use sees either the marker or the missing record,
    /// both rejected.
    async fn refresh(&self, tenant_id: &str, refresh_token: &str) -> DomainResult<TokenResponse> {
        if refresh_token.is_empty() {
            return Err(TokenError::InvalidRefreshToken.into());
        }

        let record = self
            .sessions
            .get_refresh_token(refresh_token)
            .await?
            .ok_or(TokenError::InvalidRefreshToken)?;

        if self.sessions.is_refresh_token_revoked(refresh_token).await? {
            return Err(TokenError::InvalidRefreshToken.into());
        }
        if record.is_expired() {
            return Err(TokenError::InvalidRefreshToken.into());
        }
        if record.subject.tenant_id != tenant_id {
            warn!(
                "refresh token minted for tenant {} used on tenant {}",
                record.subject.tenant_id, tenant_id
            );
            return Err(TokenError::InvalidRefreshToken.into());
        }

        let client = self
            .credentials
            .get_client(&record.client_id)
            .await?
            .ok_or(TokenError::InvalidRefreshToken)?;
        self.enforce_rate_limit(&client).await?;

        // Single-use invalidation: mark the old token revoked for its
        // residual lifetime, then delete the record.
        if let Err(e) = self
            .sessions
            .revoke_refresh_token(refresh_token, record.remaining_ttl())
            .await
        {
            warn!("failed to revoke old refresh token: {}", e);
        }
        if let Err(e) = self.sessions.delete_refresh_token(refresh_token).await {
            warn!("failed to delete old refresh token: {}", e);
        }

        let (access_token, _jti) = self.generator.mint_access_token(&record.subject)?;
        let new_refresh_token = self.generator.mint_refresh_token()?;

        let new_record = RefreshTokenRecord::new(
            record.client_id.clone(),
            record.subject.clone(),
            self.config.refresh_token_ttl,
        );
        self.sessions
            .store_refresh_token(&new_refresh_token, &new_record, self.config.refresh_token_ttl)
            .await?;

        Ok(self.token_response(access_token, new_refresh_token))
    }

    /// Resolve and authenticate the client: cache first, persistent store
    /// on a miss, bcrypt comparison off the async workers.
    ///
    /// The cache is an optimization, never a gatekeeper: a cache failure
    /// falls through to the persistent lookup.
    async fn authenticate_client(&self, client_id: &str, client_secret: &str) -> DomainResult<Client> {
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(AuthError::InvalidCredentials.into());
        }

        let cached = match self.sessions.get_cached_client(client_id).await {
            Ok(client) => client,
            Err(e) => {
                error!("failed to read client cache for {}: {}", client_id, e);
                None
            }
        };

        let client = match cached {
            Some(client) => client,
            None => {
                let client = self
                    .credentials
                    .get_client(client_id)
                    .await?
                    .ok_or(AuthError::InvalidCredentials)?;
                if let Err(e) = self.sessions.cache_client(&client, CLIENT_CACHE_TTL).await {
                    warn!("failed to cache client {}: {}", client_id, e);
                }
                client
            }
        };

        verify_client_secret(client_secret, &client.client_secret_hash).await?;

        Ok(client)
    }

    async fn enforce_rate_limit(&self, client: &Client) -> DomainResult<()> {
        let exceeded = self
            .rate_limiter
            .check(&client.client_id, client.rate_limit, RATE_LIMIT_WINDOW)
            .await?;
        if exceeded {
            return Err(AuthError::RateLimitExceeded {
                retry_after_seconds: RATE_LIMIT_WINDOW.as_secs(),
            }
            .into());
        }
        Ok(())
    }

    async fn ensure_tenant_exists(&self, tenant_id: &str) -> DomainResult<()> {
        if self.credentials.tenant_exists(tenant_id).await? {
            Ok(())
        } else {
            warn!("tenant {} does not exist", tenant_id);
            Err(AuthError::InvalidRequest.into())
        }
    }

    /// Mint the pair, persist the refresh record with the subject
    /// embedded, and touch the client's `updated_at` (best-effort). All
    /// store writes happen here, after every validation has passed.
    async fn issue_pair(&self, client: &Client, subject: TokenSubject) -> DomainResult<TokenResponse> {
        let (access_token, _jti) = self.generator.mint_access_token(&subject)?;
        let refresh_token = self.generator.mint_refresh_token()?;

        let record = RefreshTokenRecord::new(
            client.client_id.clone(),
            subject,
            self.config.refresh_token_ttl,
        );
        self.sessions
            .store_refresh_token(&refresh_token, &record, self.config.refresh_token_ttl)
            .await?;

        if let Err(e) = self.credentials.touch_client(&client.client_id).await {
            warn!("failed to update client {} updated_at: {}", client.client_id, e);
        }

        Ok(self.token_response(access_token, refresh_token))
    }

    fn token_response(&self, access_token: String, refresh_token: String) -> TokenResponse {
        TokenResponse {
            access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.config.access_token_ttl.as_secs() as i64,
            refresh_token,
        }
    }
}

/// Compare a presented secret against the stored bcrypt hash on a blocking
/// worker; the comparison takes tens of milliseconds and must not stall
/// the async executor or sit inside any component lock.
async fn verify_client_secret(secret: &str, hash: &str) -> DomainResult<()> {
    let secret = secret.to_string();
    let hash = hash.to_string();

    let matches = tokio::task::spawn_blocking(move || {
        bcrypt::verify(&secret, &hash).unwrap_or(false)
    })
    .await
    .map_err(|e| DomainError::Internal {
        message: format!("bcrypt comparison failed: {}", e),
    })?;

    if matches {
        Ok(())
    } else {
        Err(AuthError::InvalidCredentials.into())
    }
}

/// Split a comma-separated role list, trimming whitespace and dropping
/// empties. A blank input yields `None`, which preserves existing roles.
fn parse_roles(raw: &str) -> Option<Vec<String>> {
    let roles: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .map(str::to_string)
        .collect();

    if roles.is_empty() {
        None
    } else {
        Some(roles)
    }
}

#[cfg(test)]
mod parse_roles_tests {
    use super::parse_roles;

    #[test]
    fn blank_input_is_none() {
        assert_eq!(parse_roles(""), None);
        assert_eq!(parse_roles("  "), None);
        assert_eq!(parse_roles(",, ,"), None);
    }

    #[test]
    fn roles_are_trimmed_and_filtered() {
        assert_eq!(
            parse_roles(" admin , reader ,,"),
            Some(vec!["admin".to_string(), "reader".to_string()])
        );
    }
}
