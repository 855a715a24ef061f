// Folio Library - Portfolio inquiry and gated resume download
// This exposes the core components for testing and integration

pub mod cli;
pub mod config;
pub mod display;
pub mod external;
pub mod notification;
pub mod telemetry;
pub mod workflows;

// Re-export key types for easy access
pub use config::{FolioConfig, SettingsError};
pub use external::{OpenError, PrintOpener, ResourceOpener, SystemOpener};
pub use notification::{
    EmailJsClient, NotificationClient, NotificationRequest, NotificationSettings, NotifyError, TemplateKind,
};
pub use telemetry::{create_submission_span, generate_correlation_id, init_telemetry};
pub use workflows::{
    DialogState, DownloadOutcome, DownloadRequesterInput, FlowError, GatedDownloadFlow, InquiryFlow, InquiryInput,
    NotificationOutcome, SubmissionStatus, ValidationError,
};
