use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

const HISTORY_LIMIT: usize = 32;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SubmissionStatus::Idle => "idle",
            SubmissionStatus::Submitting => "submitting",
            SubmissionStatus::Success => "success",
            SubmissionStatus::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionEvent {
    Submit,
    Delivered,
    Failed { reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid transition: {event:?} not allowed while {from}")]
    InvalidTransition {
        from: SubmissionStatus,
        event: SubmissionEvent,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: SubmissionStatus,
    pub to: SubmissionStatus,
    pub event: SubmissionEvent,
    pub timestamp: DateTime<Utc>,
}

/// Idle → Submitting → Success | Error, reusable indefinitely.
///
/// Invalid events leave the status untouched and report a
/// [`TransitionError`]; the owning flow decides whether that matters.
#[derive(Debug)]
pub struct SubmissionMachine {
    flow: &'static str,
    status: SubmissionStatus,
    history: VecDeque<TransitionRecord>,
}

impl SubmissionMachine {
    pub fn new(flow: &'static str) -> Self {
        Self {
            flow,
            status: SubmissionStatus::Idle,
            history: VecDeque::with_capacity(HISTORY_LIMIT),
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.status == SubmissionStatus::Submitting
    }

    pub fn history(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.history.iter()
    }

    pub fn handle(&mut self, event: SubmissionEvent) -> Result<SubmissionStatus, TransitionError> {
        let from = self.status;
        let to = match (from, &event) {
            (
                SubmissionStatus::Idle | SubmissionStatus::Success | SubmissionStatus::Error,
                SubmissionEvent::Submit,
            ) => SubmissionStatus::Submitting,
            (SubmissionStatus::Submitting, SubmissionEvent::Delivered) => SubmissionStatus::Success,
            (SubmissionStatus::Submitting, SubmissionEvent::Failed { .. }) => SubmissionStatus::Error,
            _ => {
                debug!(flow = self.flow, from = %from, event = ?event, "Rejected submission event");
                return Err(TransitionError::InvalidTransition { from, event });
            }
        };

        self.record_transition(from, to, event);
        Ok(to)
    }

    fn record_transition(&mut self, from: SubmissionStatus, to: SubmissionStatus, event: SubmissionEvent) {
        info!(
            flow = self.flow,
            from = %from,
            to = %to,
            event = ?event,
            "Submission state transition"
        );

        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(TransitionRecord {
            from,
            to,
            event,
            timestamp: Utc::now(),
        });
        self.status = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed() -> SubmissionEvent {
        SubmissionEvent::Failed {
            reason: "HTTP 500".to_string(),
        }
    }

    #[test]
    fn test_starts_idle() {
        let machine = SubmissionMachine::new("test");
        assert_eq!(machine.status(), SubmissionStatus::Idle);
        assert!(!machine.is_submitting());
        assert_eq!(machine.history().count(), 0);
    }

    #[test]
    fn test_success_path() {
        let mut machine = SubmissionMachine::new("test");
        assert_eq!(machine.handle(SubmissionEvent::Submit), Ok(SubmissionStatus::Submitting));
        assert!(machine.is_submitting());
        assert_eq!(machine.handle(SubmissionEvent::Delivered), Ok(SubmissionStatus::Success));
    }

    #[test]
    fn test_error_then_resubmit() {
        let mut machine = SubmissionMachine::new("test");
        machine.handle(SubmissionEvent::Submit).unwrap();
        assert_eq!(machine.handle(failed()), Ok(SubmissionStatus::Error));

        // No terminal state: a new attempt clears the previous outcome
        assert_eq!(machine.handle(SubmissionEvent::Submit), Ok(SubmissionStatus::Submitting));
        assert_eq!(machine.handle(SubmissionEvent::Delivered), Ok(SubmissionStatus::Success));
        assert_eq!(machine.handle(SubmissionEvent::Submit), Ok(SubmissionStatus::Submitting));
    }

    #[test]
    fn test_double_submit_rejected() {
        let mut machine = SubmissionMachine::new("test");
        machine.handle(SubmissionEvent::Submit).unwrap();

        let err = machine.handle(SubmissionEvent::Submit).unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidTransition {
                from: SubmissionStatus::Submitting,
                event: SubmissionEvent::Submit,
            }
        );
        assert!(machine.is_submitting());
    }

    #[test]
    fn test_outcome_without_submit_rejected() {
        let mut machine = SubmissionMachine::new("test");
        assert!(machine.handle(SubmissionEvent::Delivered).is_err());
        assert!(machine.handle(failed()).is_err());
        assert_eq!(machine.status(), SubmissionStatus::Idle);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut machine = SubmissionMachine::new("test");
        for _ in 0..40 {
            machine.handle(SubmissionEvent::Submit).unwrap();
            machine.handle(SubmissionEvent::Delivered).unwrap();
        }

        assert_eq!(machine.history().count(), HISTORY_LIMIT);
        let last = machine.history().last().unwrap();
        assert_eq!(last.from, SubmissionStatus::Submitting);
        assert_eq!(last.to, SubmissionStatus::Success);
    }
}
