//! Credential repository trait: the durable record of clients, tenants,
//! users, and roles.

use async_trait::async_trait;

use crate::domain::entities::{Client, User};
use crate::errors::DomainResult;

/// Port to the persistent store.
///
/// All reads return `Ok(None)` (or `false`) for missing rows; errors are
/// reserved for backend failures, which callers map to internal errors.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Look up a client by its public identifier.
    async fn get_client(&self, client_id: &str) -> DomainResult<Option<Client>>;

    /// Bump the client's `updated_at`. Call sites treat failures as
    /// best-effort: logged, never surfaced to the caller of a grant.
    async fn touch_client(&self, client_id: &str) -> DomainResult<()>;

    /// Whether the tenant exists. Tenants are never auto-created here.
    async fn tenant_exists(&self, tenant_id: &str) -> DomainResult<bool>;

    /// Look up a user by id.
    async fn get_user(&self, user_id: &str) -> DomainResult<Option<User>>;

    /// The user's current role set; empty when the user has none.
    async fn get_user_roles(&self, user_id: &str) -> DomainResult<Vec<String>>;

    /// Insert or fully overwrite the user row and, when `roles` is
    /// provided, atomically replace the user's role set. `None` leaves the
    /// existing roles untouched; an empty slice clears them.
    async fn upsert_user_with_roles(
        &self,
        user: &User,
        roles: Option<&[String]>,
    ) -> DomainResult<()>;
}
