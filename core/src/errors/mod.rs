//! Domain-specific error types and error handling.
//!
//! The HTTP status and wire code for each variant are assigned in the API
//! layer; this module only names the failure modes.

use thiserror::Error;

/// Authentication and request-shape errors raised by the grant machine.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid client credentials")]
    InvalidCredentials,

    #[error("Invalid grant type")]
    InvalidGrant,

    #[error("Invalid request")]
    InvalidRequest,

    #[error("Rate limit exceeded")]
    RateLimitExceeded {
        /// Seconds until the current window closes.
        retry_after_seconds: u64,
    },
}

/// Token parsing, validation, and key-management errors.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Unexpected signing algorithm")]
    UnsupportedAlgorithm,

    #[error("Missing kid in token header")]
    MissingKeyId,

    #[error("Unknown or expired signing key: {kid}")]
    UnknownKey { kid: String },

    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Invalid issuer")]
    InvalidIssuer,

    #[error("Invalid audience")]
    InvalidAudience,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Token has been revoked")]
    TokenRevoked,

    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,

    #[error("Token generation failed")]
    TokenGenerationFailed,

    #[error("Bad signing key: {message}")]
    BadKey { message: String },
}

/// Core domain errors.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

pub type DomainResult<T> = Result<T, DomainError>;
