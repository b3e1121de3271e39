//! Tenant entity.

use serde::{Deserialize, Serialize};

/// A tenant namespace. Tenants are provisioned by operator tooling and are
/// never auto-created at the token-service boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Tenant identifier used as the first path segment of every
    /// tenant-scoped endpoint and as the `tid` claim.
    pub id: String,

    /// Optional identifier in an external directory.
    #[serde(default)]
    pub external_id: Option<String>,

    /// Display name.
    pub name: String,
}
