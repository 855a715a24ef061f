use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, error, info, warn, Instrument};
use url::Url;

use super::errors::FlowError;
use super::guard::{lock_state, InFlightGuard};
use super::inquiry::DEFAULT_SUBMIT_TIMEOUT;
use super::state_machine::{SubmissionEvent, SubmissionMachine, SubmissionStatus, TransitionRecord};
use super::validation::{DownloadRequesterInput, Validated};
use crate::external::ResourceOpener;
use crate::notification::{
    send_with_timeout, NotificationClient, NotificationRequest, NotificationSettings, NotifyError,
};
use crate::telemetry::{create_submission_span, generate_correlation_id};

const FLOW_NAME: &str = "gated_download";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DialogState {
    #[default]
    Closed,
    Open,
}

/// What happened to the owner notice. Kept for diagnostics; never shown to
/// the visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    Delivered,
    Failed(NotifyError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Released {
        url: Url,
        notification: NotificationOutcome,
    },
    /// Another confirm for this flow is still outstanding.
    InFlight,
}

#[derive(Debug)]
struct DownloadState {
    dialog: DialogState,
    draft: DownloadRequesterInput,
    machine: SubmissionMachine,
}

/// The caller dropped `confirm` before the resource was released. Nothing
/// was opened, so the dialog closes and the visitor starts over.
fn abandon_download(state: &mut DownloadState) {
    warn!("Download confirm dropped before the resource was released");
    if let Err(e) = state.machine.handle(SubmissionEvent::Failed {
        reason: "cancelled".to_string(),
    }) {
        debug!(error = %e, "Nothing to roll back");
    }
    state.dialog = DialogState::Closed;
}

/// Resume download behind a name/email capture dialog.
///
/// The owner notice is best effort: once the dialog is confirmed with valid
/// input the resource is released whether or not the notice went out.
pub struct GatedDownloadFlow {
    client: Arc<dyn NotificationClient>,
    settings: Arc<NotificationSettings>,
    opener: Arc<dyn ResourceOpener>,
    resource_url: Url,
    timeout: Duration,
    state: Mutex<DownloadState>,
}

impl std::fmt::Debug for GatedDownloadFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatedDownloadFlow")
            .field("settings", &self.settings)
            .field("resource_url", &self.resource_url.as_str())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GatedDownloadFlow {
    pub fn new(
        client: Arc<dyn NotificationClient>,
        settings: impl Into<Arc<NotificationSettings>>,
        opener: Arc<dyn ResourceOpener>,
        resource_url: Url,
    ) -> Self {
        Self {
            client,
            settings: settings.into(),
            opener,
            resource_url,
            timeout: DEFAULT_SUBMIT_TIMEOUT,
            state: Mutex::new(DownloadState {
                dialog: DialogState::Closed,
                draft: DownloadRequesterInput::default(),
                machine: SubmissionMachine::new(FLOW_NAME),
            }),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn resource_url(&self) -> &Url {
        &self.resource_url
    }

    fn lock(&self) -> MutexGuard<'_, DownloadState> {
        lock_state(&self.state)
    }

    pub async fn dialog(&self) -> DialogState {
        self.lock().dialog
    }

    pub async fn status(&self) -> SubmissionStatus {
        self.lock().machine.status()
    }

    pub async fn is_submitting(&self) -> bool {
        self.lock().machine.is_submitting()
    }

    pub async fn draft(&self) -> DownloadRequesterInput {
        self.lock().draft.clone()
    }

    pub async fn update_draft(&self, edit: impl FnOnce(&mut DownloadRequesterInput)) {
        edit(&mut self.lock().draft);
    }

    pub async fn history(&self) -> Vec<TransitionRecord> {
        self.lock().machine.history().cloned().collect()
    }

    /// Download trigger: opens the capture dialog. Ignored while a confirm is
    /// outstanding.
    pub async fn request_download(&self) -> DialogState {
        let mut state = self.lock();
        if state.machine.is_submitting() {
            debug!("Download already in flight, trigger ignored");
            return state.dialog;
        }
        state.dialog = DialogState::Open;
        info!("Resume capture dialog opened");
        state.dialog
    }

    /// Dismiss the dialog without confirming; the draft is kept.
    pub async fn cancel(&self) -> DialogState {
        let mut state = self.lock();
        state.dialog = DialogState::Closed;
        debug!("Resume capture dialog dismissed");
        state.dialog
    }

    pub async fn confirm_draft(&self) -> Result<DownloadOutcome, FlowError> {
        let draft = self.draft().await;
        self.confirm(draft).await
    }

    /// Submit the capture dialog.
    ///
    /// Sequence: owner notice (awaited, failure logged) → open resource →
    /// clear draft → leave `Submitting` → close dialog. The resource is opened
    /// on every path past validation.
    pub async fn confirm(&self, input: DownloadRequesterInput) -> Result<DownloadOutcome, FlowError> {
        if self.dialog().await == DialogState::Closed {
            return Err(FlowError::DialogClosed);
        }
        let validated = input.validate()?;
        let correlation_id = generate_correlation_id();

        self.run_confirm(validated)
            .instrument(create_submission_span(FLOW_NAME, &correlation_id))
            .await
    }

    async fn run_confirm(&self, input: Validated<DownloadRequesterInput>) -> Result<DownloadOutcome, FlowError> {
        let request = {
            let mut state = self.lock();
            if state.machine.is_submitting() {
                debug!("Download already in flight, ignoring confirm");
                return Ok(DownloadOutcome::InFlight);
            }
            if state.dialog == DialogState::Closed {
                return Err(FlowError::DialogClosed);
            }
            state.draft = (*input).clone();
            state.machine.handle(SubmissionEvent::Submit)?;
            NotificationRequest::download_notice(&self.settings, &input)
        };

        let in_flight = InFlightGuard::arm(&self.state, abandon_download);
        let notification = match send_with_timeout(self.client.as_ref(), &request, self.timeout).await {
            Ok(()) => NotificationOutcome::Delivered,
            Err(e) => {
                warn!(error = %e, "Download notice failed, releasing resource anyway");
                NotificationOutcome::Failed(e)
            }
        };

        let opened = self.opener.open(&self.resource_url).await;
        in_flight.disarm();
        if let Err(e) = &opened {
            error!(error = %e, url = %self.resource_url, "Failed to open resource");
        }

        {
            let mut state = self.lock();
            state.draft = DownloadRequesterInput::default();
            let event = match &notification {
                NotificationOutcome::Delivered => SubmissionEvent::Delivered,
                NotificationOutcome::Failed(e) => SubmissionEvent::Failed { reason: e.to_string() },
            };
            state.machine.handle(event)?;
            state.dialog = DialogState::Closed;
        }

        opened?;
        info!(url = %self.resource_url, "Resume released");
        Ok(DownloadOutcome::Released {
            url: self.resource_url.clone(),
            notification,
        })
    }
}
