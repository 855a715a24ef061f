use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, warn, Instrument};

use super::errors::FlowError;
use super::guard::{lock_state, InFlightGuard};
use super::state_machine::{SubmissionEvent, SubmissionMachine, SubmissionStatus, TransitionRecord};
use super::validation::{InquiryInput, Validated};
use crate::notification::{send_with_timeout, NotificationClient, NotificationRequest, NotificationSettings};
use crate::telemetry::{create_submission_span, generate_correlation_id};

const FLOW_NAME: &str = "inquiry";

pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

pub const SUCCESS_MESSAGE: &str = "Message sent successfully! I'll get back to you soon.";
pub const FAILURE_MESSAGE: &str = "Failed to send message. Please try again or email me directly.";

/// Inline text shown under the contact form for a status, if any.
pub fn status_message(status: SubmissionStatus) -> Option<&'static str> {
    match status {
        SubmissionStatus::Success => Some(SUCCESS_MESSAGE),
        SubmissionStatus::Error => Some(FAILURE_MESSAGE),
        SubmissionStatus::Idle | SubmissionStatus::Submitting => None,
    }
}

#[derive(Debug)]
struct InquiryState {
    draft: InquiryInput,
    machine: SubmissionMachine,
}

/// The caller dropped `submit` mid-send. The draft stays for a retry.
fn abandon_submission(state: &mut InquiryState) {
    warn!("Inquiry submission dropped before the service answered");
    if let Err(e) = state.machine.handle(SubmissionEvent::Failed {
        reason: "cancelled".to_string(),
    }) {
        debug!(error = %e, "Nothing to roll back");
    }
}

/// Contact form: one notification per accepted submit.
pub struct InquiryFlow {
    client: Arc<dyn NotificationClient>,
    settings: Arc<NotificationSettings>,
    timeout: Duration,
    state: Mutex<InquiryState>,
}

impl std::fmt::Debug for InquiryFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InquiryFlow")
            .field("settings", &self.settings)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl InquiryFlow {
    pub fn new(client: Arc<dyn NotificationClient>, settings: impl Into<Arc<NotificationSettings>>) -> Self {
        Self {
            client,
            settings: settings.into(),
            timeout: DEFAULT_SUBMIT_TIMEOUT,
            state: Mutex::new(InquiryState {
                draft: InquiryInput::default(),
                machine: SubmissionMachine::new(FLOW_NAME),
            }),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn lock(&self) -> MutexGuard<'_, InquiryState> {
        lock_state(&self.state)
    }

    pub async fn status(&self) -> SubmissionStatus {
        self.lock().machine.status()
    }

    /// True while a submission is outstanding; hosts disable their submit
    /// control on this.
    pub async fn is_submitting(&self) -> bool {
        self.lock().machine.is_submitting()
    }

    pub async fn draft(&self) -> InquiryInput {
        self.lock().draft.clone()
    }

    pub async fn update_draft(&self, edit: impl FnOnce(&mut InquiryInput)) {
        edit(&mut self.lock().draft);
    }

    pub async fn history(&self) -> Vec<TransitionRecord> {
        self.lock().machine.history().cloned().collect()
    }

    pub async fn status_message(&self) -> Option<&'static str> {
        status_message(self.status().await)
    }

    /// Submit whatever is currently in the draft.
    pub async fn submit_draft(&self) -> Result<SubmissionStatus, FlowError> {
        let draft = self.draft().await;
        self.submit(draft).await
    }

    /// Validate and send `input`.
    ///
    /// Invalid input is rejected before anything changes. A submit while
    /// another is outstanding is ignored and reports `Submitting`.
    pub async fn submit(&self, input: InquiryInput) -> Result<SubmissionStatus, FlowError> {
        let validated = input.validate()?;
        let correlation_id = generate_correlation_id();

        self.run_submission(validated)
            .instrument(create_submission_span(FLOW_NAME, &correlation_id))
            .await
    }

    async fn run_submission(&self, input: Validated<InquiryInput>) -> Result<SubmissionStatus, FlowError> {
        let request = {
            let mut state = self.lock();
            if state.machine.is_submitting() {
                debug!("Inquiry already in flight, ignoring submit");
                return Ok(SubmissionStatus::Submitting);
            }
            state.draft = (*input).clone();
            state.machine.handle(SubmissionEvent::Submit)?;
            NotificationRequest::inquiry(&self.settings, &input)
        };

        let in_flight = InFlightGuard::arm(&self.state, abandon_submission);
        let outcome = send_with_timeout(self.client.as_ref(), &request, self.timeout).await;
        in_flight.disarm();

        let mut state = self.lock();
        let status = match outcome {
            Ok(()) => {
                state.draft = InquiryInput::default();
                state.machine.handle(SubmissionEvent::Delivered)?
            }
            Err(error) => {
                warn!(error = %error, "Inquiry notification failed, keeping draft for retry");
                state.machine.handle(SubmissionEvent::Failed {
                    reason: error.to_string(),
                })?
            }
        };
        Ok(status)
    }
}
