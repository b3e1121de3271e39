use std::sync::Arc;

use actix_web::{web, HttpServer};
use dotenv::dotenv;
use log::info;

use session_api::{create_app, AppState};
use session_core::services::auth::TokenService;
use session_core::services::token::{
    KeyManager, KeyRotationScheduler, TokenConfig, TokenGenerator, TokenVerifier,
};
use session_infra::cache::{RedisClient, RedisSessionStore};
use session_infra::database::{create_pool, PgCredentialRepository};
use session_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("starting session service");

    let config = AppConfig::from_env()?;

    // Persistent and ephemeral stores.
    let pool = create_pool(&config.database).await?;
    let redis = RedisClient::connect(&config.cache).await?;
    let credentials = Arc::new(PgCredentialRepository::new(pool));
    let sessions = Arc::new(RedisSessionStore::new(redis));

    // Signing keys, seeded from the configured PEM pair and rotated on
    // schedule for as long as the process lives.
    let key_manager = Arc::new(KeyManager::from_pem(
        &config.jwt.private_key_pem,
        &config.jwt.public_key_pem,
    )?);
    KeyRotationScheduler::new(Arc::clone(&key_manager), config.rotation).spawn();

    let token_config = TokenConfig::from(&config.jwt);
    let generator = TokenGenerator::new(Arc::clone(&key_manager), token_config.clone());
    let verifier = TokenVerifier::new(
        Arc::clone(&key_manager),
        Arc::clone(&sessions),
        &token_config,
    );
    let token_service = TokenService::new(
        Arc::clone(&credentials),
        Arc::clone(&sessions),
        generator,
        token_config.clone(),
    );

    let state = web::Data::new(AppState {
        token_service,
        verifier,
        key_manager,
        credentials,
        base_url: config.server.base_url.clone(),
        issuer: token_config.issuer.clone(),
    });

    let bind_address = config.server.bind_address();
    info!("server binding to {}", bind_address);

    HttpServer::new(move || create_app(state.clone()))
        .bind(&bind_address)?
        .run()
        .await?;

    info!("server exited");
    Ok(())
}
