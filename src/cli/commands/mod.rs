use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::FolioConfig;
use crate::notification::{EmailJsClient, NotificationClient};

pub mod config;
pub mod contact;
pub mod init;
pub mod inquire;
pub mod resume;

pub use config::ConfigCommand;
pub use contact::ContactCommand;
pub use init::InitCommand;
pub use inquire::InquireCommand;
pub use resume::ResumeCommand;

/// Production notification transport built from configuration.
pub fn notification_client(config: &FolioConfig) -> Result<Arc<dyn NotificationClient>> {
    let client = EmailJsClient::new(
        config.notification.endpoint.clone(),
        config.rate_limit()?.get(),
        config.submit_timeout()?,
    )
    .context("Failed to set up the notification client")?;
    Ok(Arc::new(client))
}
