//! Access and refresh token generation.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use jsonwebtoken::{encode, Algorithm, Header};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::domain::entities::{Claims, TokenSubject};
use crate::errors::{DomainResult, TokenError};

use super::config::TokenConfig;
use super::key_manager::KeyManager;

/// Mints signed access tokens and opaque refresh tokens.
pub struct TokenGenerator {
    key_manager: Arc<KeyManager>,
    config: TokenConfig,
}

impl TokenGenerator {
    pub fn new(key_manager: Arc<KeyManager>, config: TokenConfig) -> Self {
        Self {
            key_manager,
            config,
        }
    }

    /// Mint an RS256 access token for a subject.
    ///
    /// The header carries the current signing key's `kid` so verifiers can
    /// select the right key from the JWKS across rotations. Returns the
    /// compact serialization together with the token's `jti`.
    pub fn mint_access_token(&self, subject: &TokenSubject) -> DomainResult<(String, String)> {
        let (encoding_key, kid) = self.key_manager.current_signing_key()?;

        let claims = Claims::new_access_token(
            subject,
            &self.config.issuer,
            &self.config.audience,
            self.config.access_token_ttl,
        );
        let jti = claims.jti.clone().unwrap_or_default();

        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(kid);

        let token = encode(&header, &claims, &encoding_key)
            .map_err(|_| TokenError::TokenGenerationFailed)?;

        Ok((token, jti))
    }

    /// Mint an opaque refresh token: N cryptographically random bytes,
    /// URL-safe base64 without padding. The caller persists it; nothing is
    /// written here.
    pub fn mint_refresh_token(&self) -> DomainResult<String> {
        let mut bytes = vec![0u8; self.config.refresh_token_length];
        OsRng.fill_bytes(&mut bytes);
        Ok(URL_SAFE_NO_PAD.encode(&bytes))
    }
}
