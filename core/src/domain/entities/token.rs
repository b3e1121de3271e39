//! Token entities: claims, subjects, and refresh-token records.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token type emitted in every token response.
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// The non-PII identity bundle a token is minted for.
///
/// The subject is embedded verbatim inside every refresh-token record so
/// that rotation can re-mint equivalent access tokens without rereading
/// user state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSubject {
    pub user_id: String,

    pub tenant_id: String,

    #[serde(default)]
    pub roles: Vec<String>,

    #[serde(default)]
    pub scopes: Vec<String>,
}

impl TokenSubject {
    pub fn new(user_id: impl Into<String>, tenant_id: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            user_id: user_id.into(),
            tenant_id: tenant_id.into(),
            roles,
            scopes: Vec::new(),
        }
    }
}

/// Claims structure for the JWT payload.
///
/// `roles` and `scp` are omitted from the serialization entirely when
/// empty; `sub` and `oid` always carry the same user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer.
    pub iss: String,

    /// Audience.
    pub aud: String,

    /// Expiration timestamp (seconds since epoch, exclusive).
    pub exp: i64,

    /// Issued-at timestamp (seconds since epoch, inclusive).
    pub iat: i64,

    /// Not-before timestamp; never minted, only honored when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Unique token identifier, used for revocation bookkeeping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Subject (user id).
    pub sub: String,

    /// Object id, mirrors `sub`.
    pub oid: String,

    /// Tenant id.
    pub tid: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scp: Option<Vec<String>>,
}

impl Claims {
    /// Creates access-token claims for a subject.
    pub fn new_access_token(
        subject: &TokenSubject,
        issuer: &str,
        audience: &str,
        ttl: std::time::Duration,
    ) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::seconds(ttl.as_secs() as i64);

        Self {
            iss: issuer.to_string(),
            aud: audience.to_string(),
            exp: expiry.timestamp(),
            iat: now.timestamp(),
            nbf: None,
            jti: Some(Uuid::new_v4().to_string()),
            sub: subject.user_id.clone(),
            oid: subject.user_id.clone(),
            tid: subject.tenant_id.clone(),
            roles: (!subject.roles.is_empty()).then(|| subject.roles.clone()),
            scp: (!subject.scopes.is_empty()).then(|| subject.scopes.clone()),
        }
    }

    /// `exp` is exclusive: a token is expired from the very second named
    /// in the claim.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Reconstructs the subject bundle carried by these claims.
    pub fn subject(&self) -> TokenSubject {
        TokenSubject {
            user_id: self.sub.clone(),
            tenant_id: self.tid.clone(),
            roles: self.roles.clone().unwrap_or_default(),
            scopes: self.scp.clone().unwrap_or_default(),
        }
    }
}

/// Refresh-token record persisted in the ephemeral store, keyed by the
/// opaque token string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// Client that requested the original grant; consulted again for rate
    /// limiting on rotation.
    pub client_id: String,

    /// Full subject, carried through every rotation.
    pub subject: TokenSubject,

    pub expires_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    pub fn new(client_id: impl Into<String>, subject: TokenSubject, ttl: std::time::Duration) -> Self {
        Self {
            client_id: client_id.into(),
            subject,
            expires_at: Utc::now() + Duration::seconds(ttl.as_secs() as i64),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Residual lifetime, clamped to zero once expired. Used as the TTL of
    /// the revocation marker written when the token is consumed.
    pub fn remaining_ttl(&self) -> std::time::Duration {
        let remaining = self.expires_at - Utc::now();
        remaining.to_std().unwrap_or(std::time::Duration::ZERO)
    }
}

/// Successful token response returned for every grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,

    pub token_type: String,

    /// Access-token lifetime in seconds.
    pub expires_in: i64,

    pub refresh_token: String,
}
