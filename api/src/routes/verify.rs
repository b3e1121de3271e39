//! Handler for `POST /{tenant_id}/oauth2/v1.0/verify`.

use actix_web::{web, HttpResponse};
use log::debug;

use session_core::errors::TokenError;
use session_core::repositories::{CredentialRepository, SessionStore};

use crate::app::AppState;
use crate::dto::{VerifyRequest, VerifyResponse};
use crate::handlers::error::domain_error_response;

/// Validate an access token. Verification failures are reported with
/// HTTP 200 and `valid: false`; only a missing token is a request error.
/// The path tenant must match the token's `tid` claim.
pub async fn verify_token<C, S>(
    path: web::Path<String>,
    request: web::Json<VerifyRequest>,
    state: web::Data<AppState<C, S>>,
) -> HttpResponse
where
    C: CredentialRepository + 'static,
    S: SessionStore + 'static,
{
    let tenant_id = path.into_inner();

    if request.token.is_empty() {
        return domain_error_response(&TokenError::InvalidTokenFormat.into());
    }

    let claims = match state.verifier.verify(&request.token).await {
        Ok(claims) => claims,
        Err(error) => {
            debug!("token validation failed: {}", error);
            return HttpResponse::Ok().json(VerifyResponse::invalid(error.to_string()));
        }
    };

    if claims.tid != tenant_id {
        debug!(
            "tenant mismatch: path {} vs token {}",
            tenant_id, claims.tid
        );
        return HttpResponse::Ok().json(VerifyResponse::invalid(
            "tenant_id in path does not match token tenant_id",
        ));
    }

    match serde_json::to_value(&claims) {
        Ok(claims) => HttpResponse::Ok().json(VerifyResponse::valid(claims)),
        Err(e) => {
            log::error!("failed to serialize claims: {}", e);
            domain_error_response(&session_core::errors::DomainError::Internal {
                message: e.to_string(),
            })
        }
    }
}
