use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Jitter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::client::{NotificationClient, NotifyError};
use super::types::NotificationRequest;

pub const DEFAULT_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error("requests_per_second must be greater than zero")]
    ZeroRate,
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Rate-limited JSON client for the email service's send endpoint
#[derive(Debug, Clone)]
pub struct EmailJsClient {
    http: reqwest::Client,
    endpoint: String,
    request_timeout: Duration,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl EmailJsClient {
    /// `request_timeout` bounds a single HTTP exchange; flows apply their own
    /// timeout on top of this.
    pub fn new(
        endpoint: impl Into<String>,
        requests_per_second: u32,
        request_timeout: Duration,
    ) -> Result<Self, ClientBuildError> {
        let per_second = NonZeroU32::new(requests_per_second).ok_or(ClientBuildError::ZeroRate)?;
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(per_second)));

        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            request_timeout,
            rate_limiter,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl NotificationClient for EmailJsClient {
    async fn send(&self, request: &NotificationRequest) -> Result<(), NotifyError> {
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(100)))
            .await;

        debug!(
            endpoint = %self.endpoint,
            template_id = %request.template_id,
            "Sending notification"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotifyError::Timeout {
                        timeout_ms: self.request_timeout.as_millis() as u64,
                    }
                } else {
                    NotifyError::Transport {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if status.is_success() {
            info!(status = status.as_u16(), template_id = %request.template_id, "Notification accepted");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), body = %body, "Notification rejected");
        Err(NotifyError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
