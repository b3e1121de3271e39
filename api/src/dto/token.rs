//! Token endpoint form payload.

use serde::Deserialize;

use session_core::domain::value_objects::GrantRequest;

/// The `application/x-www-form-urlencoded` body of a token request.
/// Every field is optional at the transport level; the grant machine
/// treats absent and blank identically.
#[derive(Debug, Default, Deserialize)]
pub struct TokenForm {
    #[serde(default)]
    pub grant_type: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_full_name: String,
    #[serde(default)]
    pub user_phone: String,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub user_roles: String,
    #[serde(default)]
    pub refresh_token: String,
}

impl From<TokenForm> for GrantRequest {
    fn from(form: TokenForm) -> Self {
        GrantRequest {
            grant_type: form.grant_type,
            client_id: form.client_id,
            client_secret: form.client_secret,
            user_id: form.user_id,
            user_full_name: form.user_full_name,
            user_phone: form.user_phone,
            user_email: form.user_email,
            user_roles: form.user_roles,
            refresh_token: form.refresh_token,
        }
    }
}
