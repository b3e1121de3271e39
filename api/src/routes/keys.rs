//! Handler for `GET /{tenant_id}/discovery/v1.0/keys`.

use actix_web::http::header;
use actix_web::{web, HttpResponse};
use log::warn;

use session_core::errors::AuthError;
use session_core::repositories::{CredentialRepository, SessionStore};

use crate::app::AppState;
use crate::handlers::error::domain_error_response;

/// Publish the JSON Web Key Set: every active, unexpired public key. The
/// tenant must exist; discovery never auto-creates one.
pub async fn jwks<C, S>(
    path: web::Path<String>,
    state: web::Data<AppState<C, S>>,
) -> HttpResponse
where
    C: CredentialRepository + 'static,
    S: SessionStore + 'static,
{
    let tenant_id = path.into_inner();

    match state.credentials.tenant_exists(&tenant_id).await {
        Ok(true) => {}
        Ok(false) => {
            warn!("JWKS requested for unknown tenant {}", tenant_id);
            return domain_error_response(&AuthError::InvalidRequest.into());
        }
        Err(error) => return domain_error_response(&error),
    }

    HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "public, max-age=3600"))
        .json(state.key_manager.jwk_set())
}
