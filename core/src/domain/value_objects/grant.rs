//! Token grant request value object.

/// Grant types accepted by the token endpoint.
pub const GRANT_CLIENT_CREDENTIALS: &str = "client_credentials";
pub const GRANT_PROVISION_USER: &str = "provision_user";
pub const GRANT_REFRESH_TOKEN: &str = "refresh_token";

/// The form-encoded parameter bag of a token request, after transport
/// decoding. Absent fields arrive as empty strings, which is also how the
/// grant machine treats blank values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantRequest {
    pub grant_type: String,
    pub client_id: String,
    pub client_secret: String,
    pub user_id: String,
    pub user_full_name: String,
    pub user_phone: String,
    pub user_email: String,
    /// Comma-separated roles; blank means "leave existing roles alone".
    pub user_roles: String,
    pub refresh_token: String,
}
