//! User entity.

use serde::{Deserialize, Serialize};

/// A provisioned user. The PII fields (name, phone, email) live only in
/// the persistent store; they are never emitted as token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Globally unique, caller-supplied user identifier.
    pub id: String,

    /// Owning tenant; a user belongs to exactly one tenant.
    pub tenant_id: String,

    pub full_name: String,

    pub phone_number: String,

    /// Optional email; an empty string is normalized to absent before
    /// persistence.
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    /// Build a user from raw form values, normalizing empty PII strings
    /// to absent.
    pub fn from_form(
        id: impl Into<String>,
        tenant_id: impl Into<String>,
        full_name: impl Into<String>,
        phone_number: impl Into<String>,
        email: &str,
    ) -> Self {
        Self {
            id: id.into(),
            tenant_id: tenant_id.into(),
            full_name: full_name.into(),
            phone_number: phone_number.into(),
            email: if email.is_empty() {
                None
            } else {
                Some(email.to_string())
            },
        }
    }
}
