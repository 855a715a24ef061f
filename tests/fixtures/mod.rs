//! Shared fixtures for folio integration tests
//!
//! The email service is replaced by a wiremock server; the resource opener by
//! a recorder that can be told to fail.

#![allow(dead_code)]

use async_trait::async_trait;
use folio::notification::EmailJsClient;
use folio::{NotificationClient, NotificationSettings, OpenError, ResourceOpener};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SEND_PATH: &str = "/api/v1.0/email/send";
pub const RESUME_URL: &str = "https://files.example.com/resume.pdf";

pub fn settings() -> NotificationSettings {
    NotificationSettings {
        service_id: "service_test".to_string(),
        public_key: "pk_test".to_string(),
        inquiry_template_id: "template_inquiry".to_string(),
        download_template_id: "template_resume".to_string(),
        recipient_email: "owner@example.com".to_string(),
    }
}

pub fn resume_url() -> Url {
    Url::parse(RESUME_URL).unwrap()
}

/// Email service mock server for deterministic testing
pub struct EmailServiceMock {
    pub server: MockServer,
}

impl EmailServiceMock {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.server.uri(), SEND_PATH)
    }

    /// Answer every send with the given status.
    pub async fn respond_with(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string(if status < 300 { "OK" } else { "nope" }))
            .mount(&self.server)
            .await;
    }

    /// Client pointed at this server without rate limiting getting in the way.
    pub fn client(&self) -> Arc<dyn NotificationClient> {
        Arc::new(EmailJsClient::new(self.endpoint(), 50, Duration::from_secs(5)).unwrap())
    }

    pub async fn received_bodies(&self) -> Vec<serde_json::Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| serde_json::from_slice(&request.body).unwrap())
            .collect()
    }
}

/// Records every URL it is asked to open.
#[derive(Default)]
pub struct RecordingOpener {
    opened: Mutex<Vec<Url>>,
    fail: bool,
}

impl RecordingOpener {
    pub fn failing() -> Self {
        Self {
            opened: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn opened(&self) -> Vec<Url> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResourceOpener for RecordingOpener {
    async fn open(&self, url: &Url) -> Result<(), OpenError> {
        self.opened.lock().unwrap().push(url.clone());
        if self.fail {
            return Err(OpenError::Output {
                message: "no display".to_string(),
            });
        }
        Ok(())
    }
}
