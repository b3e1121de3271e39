//! Route-level tests of the full grant and verification flows, running
//! against the in-memory repository mocks.

use std::sync::{Arc, OnceLock};

use actix_web::{test, web};
use chrono::Utc;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::RsaPrivateKey;

use session_api::{create_app, AppState};
use session_core::domain::entities::Client;
use session_core::repositories::mocks::{MockCredentialRepository, MockSessionStore};
use session_core::services::auth::TokenService;
use session_core::services::token::{KeyManager, TokenConfig, TokenGenerator, TokenVerifier};

const CLIENT_ID: &str = "bff-web";
const CLIENT_SECRET: &str = "s3cr3t";

type TestState = web::Data<AppState<MockCredentialRepository, MockSessionStore>>;

static TEST_PEMS: OnceLock<(String, String)> = OnceLock::new();

fn test_pems() -> &'static (String, String) {
    TEST_PEMS.get_or_init(|| {
        let key = RsaPrivateKey::new(&mut rand::rngs::OsRng, 2048).unwrap();
        let private_pem = key.to_pkcs8_pem(LineEnding::LF).unwrap().to_string();
        let public_pem = key.to_public_key().to_public_key_pem(LineEnding::LF).unwrap();
        (private_pem, public_pem)
    })
}

fn test_state(rate_limit: u32) -> TestState {
    let (private_pem, public_pem) = test_pems();

    let credentials = Arc::new(
        MockCredentialRepository::new()
            .with_tenant("t-1")
            .with_tenant("t-2")
            .with_client(Client {
                id: 1,
                client_id: CLIENT_ID.to_string(),
                client_secret_hash: bcrypt::hash(CLIENT_SECRET, 4).unwrap(),
                rate_limit,
                tenant_id: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }),
    );
    let sessions = Arc::new(MockSessionStore::new());
    let key_manager = Arc::new(KeyManager::from_pem(private_pem, public_pem).unwrap());
    let config = TokenConfig::default();

    let generator = TokenGenerator::new(Arc::clone(&key_manager), config.clone());
    let verifier = TokenVerifier::new(Arc::clone(&key_manager), Arc::clone(&sessions), &config);
    let token_service = TokenService::new(
        Arc::clone(&credentials),
        Arc::clone(&sessions),
        generator,
        config.clone(),
    );

    web::Data::new(AppState {
        token_service,
        verifier,
        key_manager,
        credentials,
        base_url: String::from("http://localhost:8080"),
        issuer: config.issuer,
    })
}

fn token_request(tenant: &str, form: &[(&str, &str)]) -> test::TestRequest {
    test::TestRequest::post()
        .uri(&format!("/{}/oauth2/v2.0/token", tenant))
        .set_form(form)
}

fn verify_request(tenant: &str, token: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri(&format!("/{}/oauth2/v1.0/verify", tenant))
        .set_json(serde_json::json!({ "token": token }))
}

fn provision_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("grant_type", "provision_user"),
        ("client_id", CLIENT_ID),
        ("client_secret", CLIENT_SECRET),
        ("user_id", "u-1"),
        ("user_full_name", "Ada Lovelace"),
        ("user_phone", "+4400000000"),
        ("user_roles", "admin,reader"),
    ]
}

#[actix_web::test]
async fn provision_then_verify_round_trip() {
    let app = test::init_service(create_app(test_state(100))).await;

    let response =
        test::call_service(&app, token_request("t-1", &provision_form()).to_request()).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 3600);
    let access_token = body["access_token"].as_str().unwrap().to_string();
    assert!(!body["refresh_token"].as_str().unwrap().is_empty());

    // Verify against the tenant the token was minted for.
    let response = test::call_service(&app, verify_request("t-1", &access_token).to_request()).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["claims"]["tid"], "t-1");
    assert_eq!(body["claims"]["sub"], "u-1");
    assert_eq!(body["claims"]["oid"], "u-1");
    assert_eq!(
        body["claims"]["roles"],
        serde_json::json!(["admin", "reader"])
    );

    // The same token presented under another tenant is not valid.
    let response = test::call_service(&app, verify_request("t-2", &access_token).to_request()).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["valid"], false);
    assert!(body.get("claims").is_none());
}

#[actix_web::test]
async fn client_credentials_works_after_provisioning_only() {
    let app = test::init_service(create_app(test_state(100))).await;

    let login = vec![
        ("grant_type", "client_credentials"),
        ("client_id", CLIENT_ID),
        ("client_secret", CLIENT_SECRET),
        ("user_id", "u-1"),
    ];

    let response = test::call_service(&app, token_request("t-1", &login).to_request()).await;
    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["error"], "INVALID_REQUEST");

    let response =
        test::call_service(&app, token_request("t-1", &provision_form()).to_request()).await;
    assert_eq!(response.status().as_u16(), 200);

    let response = test::call_service(&app, token_request("t-1", &login).to_request()).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert!(!body["access_token"].as_str().unwrap().is_empty());
}

#[actix_web::test]
async fn wrong_client_secret_is_unauthorized() {
    let app = test::init_service(create_app(test_state(100))).await;

    let mut form = provision_form();
    form[2] = ("client_secret", "wrong");
    let response = test::call_service(&app, token_request("t-1", &form).to_request()).await;
    assert_eq!(response.status().as_u16(), 401);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["error"], "INVALID_CREDENTIALS");
}

#[actix_web::test]
async fn unknown_grant_type_is_a_bad_request() {
    let app = test::init_service(create_app(test_state(100))).await;

    let response = test::call_service(
        &app,
        token_request("t-1", &[("grant_type", "password")]).to_request(),
    )
    .await;
    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["error"], "INVALID_GRANT");
}

#[actix_web::test]
async fn refresh_is_single_use_over_http() {
    let app = test::init_service(create_app(test_state(100))).await;

    let response =
        test::call_service(&app, token_request("t-1", &provision_form()).to_request()).await;
    let body: serde_json::Value = test::read_body_json(response).await;
    let refresh_token = body["refresh_token"].as_str().unwrap().to_string();

    let rotate = vec![
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token.as_str()),
    ];
    let response = test::call_service(&app, token_request("t-1", &rotate).to_request()).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_ne!(body["refresh_token"].as_str().unwrap(), refresh_token);

    // Replaying the consumed token hits the revocation marker.
    let response = test::call_service(&app, token_request("t-1", &rotate).to_request()).await;
    assert_eq!(response.status().as_u16(), 401);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["error"], "INVALID_REFRESH_TOKEN");
}

#[actix_web::test]
async fn cross_tenant_refresh_is_rejected() {
    let app = test::init_service(create_app(test_state(100))).await;

    let response =
        test::call_service(&app, token_request("t-1", &provision_form()).to_request()).await;
    let body: serde_json::Value = test::read_body_json(response).await;
    let refresh_token = body["refresh_token"].as_str().unwrap().to_string();

    let rotate = vec![
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token.as_str()),
    ];
    let response = test::call_service(&app, token_request("t-2", &rotate).to_request()).await;
    assert_eq!(response.status().as_u16(), 401);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["error"], "INVALID_REFRESH_TOKEN");
}

#[actix_web::test]
async fn rate_limit_returns_429_with_retry_after() {
    let app = test::init_service(create_app(test_state(2))).await;

    for _ in 0..2 {
        let response =
            test::call_service(&app, token_request("t-1", &provision_form()).to_request()).await;
        assert_eq!(response.status().as_u16(), 200);
    }

    let response =
        test::call_service(&app, token_request("t-1", &provision_form()).to_request()).await;
    assert_eq!(response.status().as_u16(), 429);
    assert_eq!(
        response
            .headers()
            .get("Retry-After")
            .unwrap()
            .to_str()
            .unwrap(),
        "60"
    );
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["error"], "RATE_LIMIT_EXCEEDED");
}

#[actix_web::test]
async fn jwks_serves_the_kid_used_for_signing() {
    let app = test::init_service(create_app(test_state(100))).await;

    let response =
        test::call_service(&app, token_request("t-1", &provision_form()).to_request()).await;
    let body: serde_json::Value = test::read_body_json(response).await;
    let access_token = body["access_token"].as_str().unwrap();
    let kid = jsonwebtoken::decode_header(access_token)
        .unwrap()
        .kid
        .unwrap();

    let request = test::TestRequest::get()
        .uri("/t-1/discovery/v1.0/keys")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response
            .headers()
            .get("Cache-Control")
            .unwrap()
            .to_str()
            .unwrap(),
        "public, max-age=3600"
    );
    let body: serde_json::Value = test::read_body_json(response).await;

    let keys = body["keys"].as_array().unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0]["kid"], kid);
    assert_eq!(keys[0]["kty"], "RSA");
    assert_eq!(keys[0]["alg"], "RS256");
    assert_eq!(keys[0]["use"], "sig");
}

#[actix_web::test]
async fn jwks_requires_an_existing_tenant() {
    let app = test::init_service(create_app(test_state(100))).await;

    let request = test::TestRequest::get()
        .uri("/t-nowhere/discovery/v1.0/keys")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 400);
}

#[actix_web::test]
async fn discovery_document_describes_the_service() {
    let app = test::init_service(create_app(test_state(100))).await;

    let request = test::TestRequest::get()
        .uri("/.well-known/openid-configuration")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(response).await;

    assert_eq!(body["issuer"], "session-service");
    assert_eq!(
        body["subject_types_supported"],
        serde_json::json!(["public"])
    );
    assert_eq!(
        body["id_token_signing_alg_values_supported"],
        serde_json::json!(["RS256"])
    );
    assert!(body["token_endpoint"]
        .as_str()
        .unwrap()
        .ends_with("/oauth2/v2.0/token"));
    assert!(body["jwks_uri"]
        .as_str()
        .unwrap()
        .ends_with("/discovery/v1.0/keys"));
    assert_eq!(
        body["claims_supported"],
        serde_json::json!(["sub", "iss", "aud", "exp", "iat", "jti"])
    );
}

#[actix_web::test]
async fn health_endpoint_returns_ok() {
    let app = test::init_service(create_app(test_state(100))).await;

    let request = test::TestRequest::get().uri("/t-1/health").to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 200);
    let body = test::read_body(response).await;
    assert_eq!(body, "OK");
}
