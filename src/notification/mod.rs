// Outbound owner notifications
//
// Both flows talk to the transactional-email service only through
// `NotificationClient`; `http::EmailJsClient` is the production transport.

pub mod client;
pub mod http;
pub mod types;

pub use client::{send_with_timeout, NotificationClient, NotifyError};
pub use http::EmailJsClient;
pub use types::{NotificationRequest, NotificationSettings, TemplateKind, TemplateParams};
