//! Error response structures shared by all HTTP endpoints.

use serde::{Deserialize, Serialize};

/// OAuth2-style error body: a stable machine-readable code plus a
/// human-readable description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error code for programmatic handling, e.g. `INVALID_CREDENTIALS`.
    pub error: String,

    /// Human-readable description of the failure.
    pub error_description: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            error_description: description.into(),
        }
    }
}
