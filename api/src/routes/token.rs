//! Handler for `POST /{tenant_id}/oauth2/v2.0/token`.

use actix_web::{web, HttpResponse};

use session_core::domain::value_objects::GrantRequest;
use session_core::repositories::{CredentialRepository, SessionStore};

use crate::app::AppState;
use crate::dto::TokenForm;
use crate::handlers::error::domain_error_response;

/// Issue tokens for one of the three grants. The tenant id from the path
/// pins the whole request; the grant machine does the branching.
pub async fn issue_token<C, S>(
    path: web::Path<String>,
    form: web::Form<TokenForm>,
    state: web::Data<AppState<C, S>>,
) -> HttpResponse
where
    C: CredentialRepository + 'static,
    S: SessionStore + 'static,
{
    let tenant_id = path.into_inner();
    let request: GrantRequest = form.into_inner().into();

    match state.token_service.issue(&tenant_id, &request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(error) => domain_error_response(&error),
    }
}
