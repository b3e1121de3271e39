//! Verify endpoint payloads.

use serde::{Deserialize, Serialize};

/// JSON body of a verification request.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub token: String,
}

/// Verification outcome. Failures respond with HTTP 200 and
/// `valid: false`; the message never distinguishes more than the verifier
/// itself does.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub claims: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl VerifyResponse {
    pub fn valid(claims: serde_json::Value) -> Self {
        Self {
            valid: true,
            claims: Some(claims),
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            claims: None,
            message: Some(message.into()),
        }
    }
}
