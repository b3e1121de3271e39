//! Application state and factory.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{middleware::Logger, web, App, HttpResponse};

use session_core::repositories::{CredentialRepository, SessionStore};
use session_core::services::auth::TokenService;
use session_core::services::token::{KeyManager, TokenVerifier};
use session_shared::types::response::ErrorBody;

use crate::middleware::cors::create_cors;
use crate::routes::{health, keys, oidc, token, verify};

/// Shared application state, generic over the storage backends so tests
/// can substitute the in-memory mocks.
pub struct AppState<C, S>
where
    C: CredentialRepository,
    S: SessionStore,
{
    pub token_service: TokenService<C, S>,
    pub verifier: TokenVerifier<S>,
    pub key_manager: Arc<KeyManager>,
    pub credentials: Arc<C>,
    pub base_url: String,
    pub issuer: String,
}

/// Create and configure the application with all routes and middleware.
pub fn create_app<C, S>(
    state: web::Data<AppState<C, S>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    C: CredentialRepository + 'static,
    S: SessionStore + 'static,
{
    App::new()
        .app_data(state)
        .wrap(Logger::default())
        .wrap(create_cors())
        // OIDC discovery is the only endpoint outside the tenant scope;
        // registered first so it beats the `{tenant_id}` matchers.
        .route(
            "/.well-known/openid-configuration",
            web::get().to(oidc::discovery::<C, S>),
        )
        .route(
            "/{tenant_id}/oauth2/v2.0/token",
            web::post().to(token::issue_token::<C, S>),
        )
        .route(
            "/{tenant_id}/oauth2/v1.0/verify",
            web::post().to(verify::verify_token::<C, S>),
        )
        .route(
            "/{tenant_id}/discovery/v1.0/keys",
            web::get().to(keys::jwks::<C, S>),
        )
        .route("/{tenant_id}/health", web::get().to(health::health))
        .default_service(web::route().to(not_found))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorBody::new("NOT_FOUND", "Resource not found"))
}
