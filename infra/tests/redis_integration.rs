//! Integration tests against a live Redis.
//!
//! Run with a local Redis and `cargo test -p session-infra -- --ignored`.
//! `REDIS_URL` overrides the default of redis://localhost:6379/0.

use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use session_core::domain::entities::{Client, RefreshTokenRecord, TokenSubject};
use session_core::repositories::SessionStore;
use session_infra::cache::{RedisClient, RedisSessionStore};
use session_shared::config::CacheConfig;

async fn store() -> RedisSessionStore {
    let config = CacheConfig::from_env();
    let client = RedisClient::connect(&config)
        .await
        .expect("redis must be running for integration tests");
    RedisSessionStore::new(client)
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

#[tokio::test]
#[ignore]
async fn refresh_token_records_round_trip_and_delete() {
    let store = store().await;
    let token = unique("it-refresh");

    let record = RefreshTokenRecord::new(
        "it-client",
        TokenSubject::new("it-user", "it-tenant", vec!["admin".to_string()]),
        Duration::from_secs(120),
    );

    store
        .store_refresh_token(&token, &record, Duration::from_secs(120))
        .await
        .unwrap();

    let loaded = store.get_refresh_token(&token).await.unwrap().unwrap();
    assert_eq!(loaded.client_id, "it-client");
    assert_eq!(loaded.subject.roles, vec!["admin".to_string()]);

    store.delete_refresh_token(&token).await.unwrap();
    assert!(store.get_refresh_token(&token).await.unwrap().is_none());
}

#[tokio::test]
#[ignore]
async fn revocation_markers_are_visible_until_ttl() {
    let store = store().await;
    let jti = unique("it-jti");

    assert!(!store.is_access_token_revoked(&jti).await.unwrap());
    store
        .revoke_access_token(&jti, Duration::from_secs(60))
        .await
        .unwrap();
    assert!(store.is_access_token_revoked(&jti).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn rate_limit_counter_increments_atomically() {
    let store = store().await;
    let client_id = unique("it-limiter");

    let first = store
        .increment_rate_limit(&client_id, Duration::from_secs(60))
        .await
        .unwrap();
    let second = store
        .increment_rate_limit(&client_id, Duration::from_secs(60))
        .await
        .unwrap();

    assert_eq!(first, 1);
    assert_eq!(second, 2);
}

#[tokio::test]
#[ignore]
async fn cached_clients_expire_with_their_ttl() {
    let store = store().await;
    let client_id = unique("it-client");

    let client = Client {
        id: 1,
        client_id: client_id.clone(),
        client_secret_hash: "$2b$04$placeholderplaceholderple".to_string(),
        rate_limit: 10,
        tenant_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    store
        .cache_client(&client, Duration::from_secs(1))
        .await
        .unwrap();
    assert!(store
        .get_cached_client(&client_id)
        .await
        .unwrap()
        .is_some());

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert!(store
        .get_cached_client(&client_id)
        .await
        .unwrap()
        .is_none());
}
