//! Access token verification: parse, validate, and check revocation.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};

use crate::domain::entities::Claims;
use crate::errors::{DomainResult, TokenError};
use crate::repositories::SessionStore;

use super::config::TokenConfig;
use super::key_manager::KeyManager;

/// Verifies access tokens against the key set and the revocation list.
pub struct TokenVerifier<S: SessionStore> {
    key_manager: Arc<KeyManager>,
    sessions: Arc<S>,
    validation: Validation,
}

impl<S: SessionStore> TokenVerifier<S> {
    pub fn new(key_manager: Arc<KeyManager>, sessions: Arc<S>, config: &TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        // The expiry boundary is exact; no clock skew allowance.
        validation.leeway = 0;
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);

        Self {
            key_manager,
            sessions,
            validation,
        }
    }

    /// Validate a compact access token and return its claims.
    ///
    /// Tokens without a `kid` header are always rejected; there is no
    /// fallback key. `nbf` is only enforced when the claim is present.
    pub async fn verify(&self, token: &str) -> DomainResult<Claims> {
        let header = decode_header(token).map_err(|_| TokenError::InvalidTokenFormat)?;
        if header.alg != Algorithm::RS256 {
            return Err(TokenError::UnsupportedAlgorithm.into());
        }

        let kid = match header.kid.as_deref() {
            Some(kid) if !kid.is_empty() => kid.to_string(),
            _ => return Err(TokenError::MissingKeyId.into()),
        };

        let decoding_key = self.key_manager.public_key_by_kid(&kid)?;

        let claims = decode::<Claims>(token, &decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                ErrorKind::ImmatureSignature => TokenError::TokenNotYetValid,
                ErrorKind::InvalidIssuer => TokenError::InvalidIssuer,
                ErrorKind::InvalidAudience => TokenError::InvalidAudience,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::InvalidTokenFormat,
            })?;

        let now = Utc::now().timestamp();
        // The decoder treats a token as live through the exp second; the
        // boundary here is exclusive.
        if now >= claims.exp {
            return Err(TokenError::TokenExpired.into());
        }
        if let Some(nbf) = claims.nbf {
            if nbf > now {
                return Err(TokenError::TokenNotYetValid.into());
            }
        }

        if let Some(jti) = claims.jti.as_deref().filter(|jti| !jti.is_empty()) {
            if self.sessions.is_access_token_revoked(jti).await? {
                return Err(TokenError::TokenRevoked.into());
            }
        }

        Ok(claims)
    }
}
