//! Fixed-window rate limiting per client id.

use std::sync::Arc;
use std::time::Duration;

use crate::errors::DomainResult;
use crate::repositories::SessionStore;

/// Fixed-window counter built on the session store's atomic increment.
///
/// The store applies the window TTL when a counter transitions from zero
/// to one; the limiter only interprets the resulting count. Policy on
/// limiter failures belongs to the caller.
pub struct RateLimiter<S: SessionStore> {
    sessions: Arc<S>,
}

impl<S: SessionStore> RateLimiter<S> {
    pub fn new(sessions: Arc<S>) -> Self {
        Self { sessions }
    }

    /// Count this request against the client's window. Returns `true` when
    /// the new count strictly exceeds `limit`.
    pub async fn check(&self, client_id: &str, limit: u32, window: Duration) -> DomainResult<bool> {
        let count = self
            .sessions
            .increment_rate_limit(client_id, window)
            .await?;
        Ok(count > i64::from(limit))
    }
}
