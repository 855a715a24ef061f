use anyhow::Result;
use std::sync::Arc;

use super::notification_client;
use crate::config::FolioConfig;
use crate::external::{PrintOpener, ResourceOpener, SystemOpener};
use crate::workflows::{DownloadOutcome, DownloadRequesterInput, FlowError, GatedDownloadFlow};

pub struct ResumeCommand {
    input: DownloadRequesterInput,
    print_only: bool,
}

impl ResumeCommand {
    pub fn new(name: String, email: String) -> Self {
        Self {
            input: DownloadRequesterInput { name, email },
            print_only: false,
        }
    }

    pub fn with_print_only(mut self, print_only: bool) -> Self {
        self.print_only = print_only;
        self
    }

    /// Returns false when the visitor's details were rejected.
    pub async fn execute(&self, config: &FolioConfig) -> Result<bool> {
        let settings = config.notification_settings()?;
        let resume_url = config.resume_url()?;
        let opener: Arc<dyn ResourceOpener> = if self.print_only {
            Arc::new(PrintOpener::stdout())
        } else {
            Arc::new(SystemOpener::new())
        };

        let flow = GatedDownloadFlow::new(notification_client(config)?, settings, opener, resume_url)
            .with_timeout(config.submit_timeout()?);

        flow.request_download().await;
        if !self.print_only {
            println!("📄 Preparing your download...");
        }

        match flow.confirm(self.input.clone()).await {
            Ok(DownloadOutcome::Released { .. }) => {
                if !self.print_only {
                    println!("✅ Resume opened. Thanks for your interest!");
                }
                Ok(true)
            }
            Ok(DownloadOutcome::InFlight) => Ok(true),
            Err(FlowError::Validation(e)) => {
                eprintln!("❌ {e}");
                Ok(false)
            }
            Err(FlowError::ResourceOpen(e)) => {
                tracing::debug!(error = %e, "Falling back to printing the resume URL");
                println!("⚠️  Could not launch a browser. Download the resume here:");
                println!("{}", flow.resource_url());
                Ok(true)
            }
            Err(e) => Err(e.into()),
        }
    }
}
