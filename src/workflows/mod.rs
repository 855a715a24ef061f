// Visitor-facing submission flows
//
// Each flow owns its draft input and one SubmissionMachine; nothing is
// shared between flow instances.

pub mod errors;
pub mod gated_download;
mod guard;
pub mod inquiry;
pub mod state_machine;
pub mod validation;

pub use errors::FlowError;
pub use gated_download::{DialogState, DownloadOutcome, GatedDownloadFlow, NotificationOutcome};
pub use inquiry::{status_message, InquiryFlow, DEFAULT_SUBMIT_TIMEOUT};
pub use state_machine::{SubmissionEvent, SubmissionMachine, SubmissionStatus, TransitionError, TransitionRecord};
pub use validation::{DownloadRequesterInput, InquiryInput, Validated, ValidationError};
