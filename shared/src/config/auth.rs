//! Token signing and key rotation configuration.

use serde::{Deserialize, Serialize};

use super::{env_or, env_parse_or, ConfigError};

/// JWT signing configuration.
///
/// Key material is supplied as PEM blocks; the private key may be PKCS#1
/// or PKCS#8, the public key PKIX or PKCS#1.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// PEM-encoded RSA private key used to sign tokens.
    pub private_key_pem: String,

    /// PEM-encoded RSA public key matching the private key.
    pub public_key_pem: String,

    /// `iss` claim stamped into every access token.
    pub issuer: String,

    /// `aud` claim stamped into every access token.
    pub audience: String,

    /// Access token lifetime in seconds.
    pub access_token_expiry_seconds: i64,

    /// Refresh token lifetime in seconds.
    pub refresh_token_expiry_seconds: i64,

    /// Number of random bytes in a refresh token.
    pub refresh_token_length: usize,
}

impl JwtConfig {
    /// Load signing configuration from the environment.
    ///
    /// `JWT_PRIVATE_KEY` and `JWT_PUBLIC_KEY` are mandatory and must
    /// contain PEM markers; placeholder values are rejected up front so a
    /// misconfigured deployment fails at startup rather than on the first
    /// token request.
    pub fn from_env() -> Result<Self, ConfigError> {
        let private_key_pem = env_or("JWT_PRIVATE_KEY", "");
        let public_key_pem = env_or("JWT_PUBLIC_KEY", "");

        if private_key_pem.is_empty() || public_key_pem.is_empty() {
            return Err(ConfigError::Missing(
                "JWT_PRIVATE_KEY and JWT_PUBLIC_KEY must be set".to_string(),
            ));
        }

        for (name, pem) in [
            ("JWT_PRIVATE_KEY", &private_key_pem),
            ("JWT_PUBLIC_KEY", &public_key_pem),
        ] {
            if !pem.contains("BEGIN") || !pem.contains("END") {
                return Err(ConfigError::Invalid(format!(
                    "{} does not appear to be a valid PEM block",
                    name
                )));
            }
        }

        Ok(Self {
            private_key_pem,
            public_key_pem,
            issuer: env_or("JWT_ISSUER", "session-service"),
            audience: env_or("JWT_AUDIENCE", "api"),
            access_token_expiry_seconds: env_parse_or("JWT_EXPIRY", 3600),
            refresh_token_expiry_seconds: env_parse_or("REFRESH_TOKEN_EXPIRY", 7 * 24 * 3600),
            refresh_token_length: env_parse_or("REFRESH_TOKEN_LENGTH", 32),
        })
    }
}

/// Signing key rotation schedule, in whole days.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct KeyRotationConfig {
    /// How often a new signing key is generated.
    pub rotation_days: u64,

    /// How long a retired key stays valid for verification.
    pub grace_days: u64,
}

impl Default for KeyRotationConfig {
    fn default() -> Self {
        Self {
            rotation_days: 90,
            grace_days: 14,
        }
    }
}

impl KeyRotationConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let mut config = Self {
            rotation_days: env_parse_or("KEY_ROTATION_DAYS", defaults.rotation_days),
            grace_days: env_parse_or("KEY_GRACE_DAYS", defaults.grace_days),
        };
        if config.rotation_days == 0 {
            config.rotation_days = defaults.rotation_days;
        }
        if config.grace_days == 0 {
            config.grace_days = defaults.grace_days;
        }
        config
    }
}
