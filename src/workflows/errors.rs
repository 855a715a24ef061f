use thiserror::Error;

use super::state_machine::TransitionError;
use super::validation::ValidationError;
use crate::external::OpenError;

/// Errors a flow reports to its host.
///
/// Notification failures are not here: the inquiry flow turns them into
/// `SubmissionStatus::Error` and the download flow swallows them.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("The capture dialog is not open")]
    DialogClosed,
    #[error("Resource could not be opened: {0}")]
    ResourceOpen(#[from] OpenError),
    #[error("Submission state error: {0}")]
    Transition(#[from] TransitionError),
}
