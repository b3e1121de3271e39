//! Configuration for the token services.

use std::time::Duration;

use session_shared::config::JwtConfig;

/// Runtime settings shared by the token generator and verifier.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// `iss` claim minted into, and required from, every access token.
    pub issuer: String,

    /// `aud` claim minted into, and required from, every access token.
    pub audience: String,

    /// Access-token lifetime.
    pub access_token_ttl: Duration,

    /// Refresh-token lifetime; also the TTL of the stored record.
    pub refresh_token_ttl: Duration,

    /// Number of random bytes in a refresh token before encoding.
    pub refresh_token_length: usize,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            issuer: String::from("session-service"),
            audience: String::from("api"),
            access_token_ttl: Duration::from_secs(3600),
            refresh_token_ttl: Duration::from_secs(7 * 24 * 3600),
            refresh_token_length: 32,
        }
    }
}

impl From<&JwtConfig> for TokenConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_token_ttl: Duration::from_secs(config.access_token_expiry_seconds.max(0) as u64),
            refresh_token_ttl: Duration::from_secs(
                config.refresh_token_expiry_seconds.max(0) as u64,
            ),
            refresh_token_length: config.refresh_token_length,
        }
    }
}
