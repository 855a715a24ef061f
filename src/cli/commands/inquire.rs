use anyhow::Result;

use super::notification_client;
use crate::config::FolioConfig;
use crate::workflows::{status_message, FlowError, InquiryFlow, InquiryInput, SubmissionStatus};

pub struct InquireCommand {
    input: InquiryInput,
}

impl InquireCommand {
    pub fn new(name: String, email: String, message: String) -> Self {
        Self {
            input: InquiryInput { name, email, message },
        }
    }

    pub async fn execute(&self, config: &FolioConfig) -> Result<SubmissionStatus> {
        let settings = config.notification_settings()?;
        let flow = InquiryFlow::new(notification_client(config)?, settings)
            .with_timeout(config.submit_timeout()?);

        println!("📨 Sending inquiry...");
        let status = match flow.submit(self.input.clone()).await {
            Ok(status) => status,
            Err(FlowError::Validation(e)) => {
                eprintln!("❌ {e}");
                return Ok(SubmissionStatus::Idle);
            }
            Err(e) => return Err(e.into()),
        };

        match status {
            SubmissionStatus::Success => println!("✅ {}", status_message(status).unwrap_or_default()),
            SubmissionStatus::Error => eprintln!("❌ {}", status_message(status).unwrap_or_default()),
            SubmissionStatus::Idle | SubmissionStatus::Submitting => {}
        }
        Ok(status)
    }
}
