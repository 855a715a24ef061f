use serde::{Deserialize, Serialize};

use crate::workflows::validation::{DownloadRequesterInput, InquiryInput, Validated};

/// Which configured template a request is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateKind {
    Inquiry,
    DownloadNotice,
}

/// Identifiers shared by every request sent to the email service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationSettings {
    pub service_id: String,
    pub public_key: String,
    pub inquiry_template_id: String,
    pub download_template_id: String,
    pub recipient_email: String,
}

impl NotificationSettings {
    pub fn template_id(&self, kind: TemplateKind) -> &str {
        match kind {
            TemplateKind::Inquiry => &self.inquiry_template_id,
            TemplateKind::DownloadNotice => &self.download_template_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateParams {
    pub from_name: String,
    pub from_email: String,
    pub message: String,
    pub to_email: String,
}

/// Wire payload for the email service's send endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub service_id: String,
    pub template_id: String,
    /// Public client key; the service calls it `user_id`.
    #[serde(rename = "user_id")]
    pub sender_id: String,
    pub template_params: TemplateParams,
    #[serde(skip)]
    kind: Option<TemplateKind>,
}

impl NotificationRequest {
    fn build(settings: &NotificationSettings, kind: TemplateKind, template_params: TemplateParams) -> Self {
        Self {
            service_id: settings.service_id.clone(),
            template_id: settings.template_id(kind).to_string(),
            sender_id: settings.public_key.clone(),
            template_params,
            kind: Some(kind),
        }
    }

    /// Visitor inquiry addressed to the site owner.
    pub fn inquiry(settings: &NotificationSettings, input: &Validated<InquiryInput>) -> Self {
        Self::build(
            settings,
            TemplateKind::Inquiry,
            TemplateParams {
                from_name: input.name.clone(),
                from_email: input.email.clone(),
                message: input.message.clone(),
                to_email: settings.recipient_email.clone(),
            },
        )
    }

    /// Owner notice that someone took the resume.
    pub fn download_notice(settings: &NotificationSettings, input: &Validated<DownloadRequesterInput>) -> Self {
        Self::build(
            settings,
            TemplateKind::DownloadNotice,
            TemplateParams {
                from_name: input.name.clone(),
                from_email: input.email.clone(),
                message: download_notice_message(&input.name, &input.email),
                to_email: settings.recipient_email.clone(),
            },
        )
    }

    /// None for requests that were deserialized rather than built here.
    pub fn kind(&self) -> Option<TemplateKind> {
        self.kind
    }
}

pub fn download_notice_message(name: &str, email: &str) -> String {
    format!("{name} ({email}) downloaded your resume from your portfolio website.")
}
