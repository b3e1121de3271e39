//! Client credential entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A trusted caller (typically a Backend-for-Frontend) allowed to request
/// tokens. The secret is only ever stored as a bcrypt hash.
///
/// The record is serializable because the session store caches it as JSON
/// for a short TTL; the cache never leaves the server side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Surrogate primary key in the persistent store.
    pub id: i64,

    /// Public client identifier presented on token requests.
    pub client_id: String,

    /// bcrypt hash of the client secret.
    pub client_secret_hash: String,

    /// Maximum number of grants per fixed one-minute window.
    pub rate_limit: u32,

    /// Optional tenant binding recorded at provisioning time.
    #[serde(default)]
    pub tenant_id: Option<String>,

    pub created_at: DateTime<Utc>,

    /// Bumped (best-effort) on every successful token issuance.
    pub updated_at: DateTime<Utc>,
}
