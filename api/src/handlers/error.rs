//! Central mapping from domain errors to HTTP responses.
//!
//! Status and code assignments:
//!
//! | kind | status | code |
//! |---|---|---|
//! | `InvalidCredentials` | 401 | `INVALID_CREDENTIALS` |
//! | `InvalidGrant` | 400 | `INVALID_GRANT` |
//! | `InvalidRequest` | 400 | `INVALID_REQUEST` |
//! | token errors | 401 | `INVALID_TOKEN` |
//! | `InvalidRefreshToken` | 401 | `INVALID_REFRESH_TOKEN` |
//! | `TokenRevoked` | 401 | `TOKEN_REVOKED` |
//! | `RateLimitExceeded` | 429 | `RATE_LIMIT_EXCEEDED` + `Retry-After` |
//! | everything else | 500 | `INTERNAL_SERVER_ERROR` |

use actix_web::http::header;
use actix_web::HttpResponse;

use session_core::errors::{AuthError, DomainError, TokenError};
use session_shared::types::response::ErrorBody;

/// Convert a domain error into the OAuth2-style error response.
///
/// Internal failures are logged with their cause but the response body
/// never echoes the underlying message.
pub fn domain_error_response(error: &DomainError) -> HttpResponse {
    match error {
        DomainError::Auth(AuthError::InvalidCredentials) => HttpResponse::Unauthorized()
            .json(ErrorBody::new("INVALID_CREDENTIALS", "Invalid client credentials")),

        DomainError::Auth(AuthError::InvalidGrant) => {
            HttpResponse::BadRequest().json(ErrorBody::new("INVALID_GRANT", "Invalid grant type"))
        }

        DomainError::Auth(AuthError::InvalidRequest) => {
            HttpResponse::BadRequest().json(ErrorBody::new("INVALID_REQUEST", "Invalid request"))
        }

        DomainError::Auth(AuthError::RateLimitExceeded {
            retry_after_seconds,
        }) => HttpResponse::TooManyRequests()
            .insert_header((header::RETRY_AFTER, retry_after_seconds.to_string()))
            .json(ErrorBody::new("RATE_LIMIT_EXCEEDED", "Rate limit exceeded")),

        DomainError::Token(TokenError::InvalidRefreshToken) => HttpResponse::Unauthorized().json(
            ErrorBody::new("INVALID_REFRESH_TOKEN", "Invalid or expired refresh token"),
        ),

        DomainError::Token(TokenError::TokenRevoked) => HttpResponse::Unauthorized()
            .json(ErrorBody::new("TOKEN_REVOKED", "Token has been revoked")),

        DomainError::Token(_) => HttpResponse::Unauthorized()
            .json(ErrorBody::new("INVALID_TOKEN", "Invalid or expired token")),

        DomainError::NotFound { resource } => {
            log::warn!("resource not found: {}", resource);
            HttpResponse::BadRequest().json(ErrorBody::new("INVALID_REQUEST", "Invalid request"))
        }

        DomainError::Internal { message } => {
            log::error!("internal error: {}", message);
            HttpResponse::InternalServerError().json(ErrorBody::new(
                "INTERNAL_SERVER_ERROR",
                "Internal server error",
            ))
        }
    }
}
