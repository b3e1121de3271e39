//! In-memory mock implementations of the repository ports.
//!
//! Used by unit tests in this crate and by route-level tests in the API
//! crate. State lives behind `Arc<Mutex<..>>` so clones observe the same
//! data, mirroring a shared backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::entities::{Client, RefreshTokenRecord, User};
use crate::errors::DomainResult;
use crate::repositories::{CredentialRepository, SessionStore};

/// In-memory credential repository.
#[derive(Default)]
pub struct MockCredentialRepository {
    pub clients: Arc<Mutex<HashMap<String, Client>>>,
    pub tenants: Arc<Mutex<Vec<String>>>,
    pub users: Arc<Mutex<HashMap<String, User>>>,
    pub roles: Arc<Mutex<HashMap<String, Vec<String>>>>,
    /// Client ids whose `updated_at` was touched, in call order.
    pub touched: Arc<Mutex<Vec<String>>>,
}

impl MockCredentialRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tenant(self, tenant_id: &str) -> Self {
        self.tenants.lock().unwrap().push(tenant_id.to_string());
        self
    }

    pub fn with_client(self, client: Client) -> Self {
        self.clients
            .lock()
            .unwrap()
            .insert(client.client_id.clone(), client);
        self
    }

    pub fn with_user(self, user: User, roles: Vec<String>) -> Self {
        self.roles.lock().unwrap().insert(user.id.clone(), roles);
        self.users.lock().unwrap().insert(user.id.clone(), user);
        self
    }
}

#[async_trait]
impl CredentialRepository for MockCredentialRepository {
    async fn get_client(&self, client_id: &str) -> DomainResult<Option<Client>> {
        Ok(self.clients.lock().unwrap().get(client_id).cloned())
    }

    async fn touch_client(&self, client_id: &str) -> DomainResult<()> {
        self.touched.lock().unwrap().push(client_id.to_string());
        Ok(())
    }

    async fn tenant_exists(&self, tenant_id: &str) -> DomainResult<bool> {
        Ok(self
            .tenants
            .lock()
            .unwrap()
            .iter()
            .any(|t| t == tenant_id))
    }

    async fn get_user(&self, user_id: &str) -> DomainResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(user_id).cloned())
    }

    async fn get_user_roles(&self, user_id: &str) -> DomainResult<Vec<String>> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn upsert_user_with_roles(
        &self,
        user: &User,
        roles: Option<&[String]>,
    ) -> DomainResult<()> {
        self.users
            .lock()
            .unwrap()
            .insert(user.id.clone(), user.clone());
        if let Some(roles) = roles {
            self.roles
                .lock()
                .unwrap()
                .insert(user.id.clone(), roles.to_vec());
        }
        Ok(())
    }
}

/// In-memory session store.
///
/// TTLs are recorded, not enforced; tests drive expiry through the
/// timestamps carried by the stored records themselves.
#[derive(Default)]
pub struct MockSessionStore {
    pub cached_clients: Arc<Mutex<HashMap<String, Client>>>,
    pub refresh_tokens: Arc<Mutex<HashMap<String, RefreshTokenRecord>>>,
    pub revoked_jtis: Arc<Mutex<HashMap<String, Duration>>>,
    pub revoked_refresh: Arc<Mutex<HashMap<String, Duration>>>,
    pub counters: Arc<Mutex<HashMap<String, i64>>>,
    /// Window TTLs recorded on each counter's zero-to-one transition.
    pub counter_windows: Arc<Mutex<HashMap<String, Duration>>>,
}

impl MockSessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn get_cached_client(&self, client_id: &str) -> DomainResult<Option<Client>> {
        Ok(self.cached_clients.lock().unwrap().get(client_id).cloned())
    }

    async fn cache_client(&self, client: &Client, _ttl: Duration) -> DomainResult<()> {
        self.cached_clients
            .lock()
            .unwrap()
            .insert(client.client_id.clone(), client.clone());
        Ok(())
    }

    async fn store_refresh_token(
        &self,
        token: &str,
        record: &RefreshTokenRecord,
        _ttl: Duration,
    ) -> DomainResult<()> {
        self.refresh_tokens
            .lock()
            .unwrap()
            .insert(token.to_string(), record.clone());
        Ok(())
    }

    async fn get_refresh_token(&self, token: &str) -> DomainResult<Option<RefreshTokenRecord>> {
        Ok(self.refresh_tokens.lock().unwrap().get(token).cloned())
    }

    async fn delete_refresh_token(&self, token: &str) -> DomainResult<()> {
        self.refresh_tokens.lock().unwrap().remove(token);
        Ok(())
    }

    async fn revoke_access_token(&self, jti: &str, ttl: Duration) -> DomainResult<()> {
        self.revoked_jtis
            .lock()
            .unwrap()
            .insert(jti.to_string(), ttl);
        Ok(())
    }

    async fn is_access_token_revoked(&self, jti: &str) -> DomainResult<bool> {
        Ok(self.revoked_jtis.lock().unwrap().contains_key(jti))
    }

    async fn revoke_refresh_token(&self, token: &str, ttl: Duration) -> DomainResult<()> {
        self.revoked_refresh
            .lock()
            .unwrap()
            .insert(token.to_string(), ttl);
        Ok(())
    }

    async fn is_refresh_token_revoked(&self, token: &str) -> DomainResult<bool> {
        Ok(self.revoked_refresh.lock().unwrap().contains_key(token))
    }

    async fn increment_rate_limit(&self, client_id: &str, window: Duration) -> DomainResult<i64> {
        let mut counters = self.counters.lock().unwrap();
        let count = counters.entry(client_id.to_string()).or_insert(0);
        *count += 1;
        if *count == 1 {
            self.counter_windows
                .lock()
                .unwrap()
                .insert(client_id.to_string(), window);
        }
        Ok(*count)
    }
}
