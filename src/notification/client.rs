//! Notification transport abstraction
//!
//! Flows depend on this trait rather than on an HTTP client so the real
//! transport can be swapped (or replaced in tests) without touching flow
//! logic.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use super::types::NotificationRequest;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotifyError {
    #[error("Notification rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("Notification transport failed: {message}")]
    Transport { message: String },
    #[error("Notification timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

impl NotifyError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            NotifyError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait NotificationClient: Send + Sync {
    /// Ok only when the service accepted the request.
    async fn send(&self, request: &NotificationRequest) -> Result<(), NotifyError>;
}

/// Send with an upper bound on how long the flow can sit in `Submitting`.
pub async fn send_with_timeout(
    client: &dyn NotificationClient,
    request: &NotificationRequest,
    timeout: Duration,
) -> Result<(), NotifyError> {
    match tokio::time::timeout(timeout, client.send(request)).await {
        Ok(result) => result,
        Err(_) => Err(NotifyError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}
