//! Handler for `GET /.well-known/openid-configuration`.

use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::Serialize;

use session_core::repositories::{CredentialRepository, SessionStore};

use crate::app::AppState;

/// OpenID Connect discovery document.
#[derive(Debug, Serialize)]
pub struct OidcConfiguration {
    pub token_endpoint: String,
    pub token_endpoint_auth_methods_supported: Vec<String>,
    pub jwks_uri: String,
    pub response_modes_supported: Vec<String>,
    pub subject_types_supported: Vec<String>,
    pub id_token_signing_alg_values_supported: Vec<String>,
    pub response_types_supported: Vec<String>,
    pub scopes_supported: Vec<String>,
    pub issuer: String,
    pub request_uri_parameter_supported: bool,
    pub claims_supported: Vec<String>,
}

/// Serve the discovery document. This is the only endpoint that is not
/// tenant-scoped; the advertised paths take the tenant as their first
/// segment.
pub async fn discovery<C, S>(state: web::Data<AppState<C, S>>) -> HttpResponse
where
    C: CredentialRepository + 'static,
    S: SessionStore + 'static,
{
    let config = OidcConfiguration {
        token_endpoint: format!("{}/{{tenant_id}}/oauth2/v2.0/token", state.base_url),
        token_endpoint_auth_methods_supported: vec![
            "client_secret_post".to_string(),
            "client_secret_basic".to_string(),
        ],
        jwks_uri: format!("{}/{{tenant_id}}/discovery/v1.0/keys", state.base_url),
        response_modes_supported: vec![
            "query".to_string(),
            "fragment".to_string(),
            "form_post".to_string(),
        ],
        subject_types_supported: vec!["public".to_string()],
        id_token_signing_alg_values_supported: vec!["RS256".to_string()],
        response_types_supported: vec!["code".to_string(), "token".to_string()],
        scopes_supported: vec!["openid".to_string()],
        issuer: state.issuer.clone(),
        request_uri_parameter_supported: false,
        claims_supported: ["sub", "iss", "aud", "exp", "iat", "jti"]
            .iter()
            .map(|claim| claim.to_string())
            .collect(),
    };

    HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "public, max-age=3600"))
        .json(config)
}
