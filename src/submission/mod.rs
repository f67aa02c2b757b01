//! Single-flight submission state machine.
//!
//! The coordinator owns one [`SubmissionState`] and only moves it along
//! `Idle -> Submitting -> {Succeeded, Failed} -> Idle`. Each edge has its own
//! entry point so callers can drive it from a future ([`SubmissionCoordinator::submit`]),
//! or step by step from callbacks ([`SubmissionCoordinator::begin`],
//! [`SubmissionCoordinator::complete`], [`SubmissionCoordinator::acknowledge`]).
//!
//! There is no timeout and no cancellation: once a ticket is issued the
//! coordinator stays `Submitting` until that ticket completes.

mod operation;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::SubmissionError;
use crate::notify::{Notification, NotificationTemplates};
use crate::schema::NormalizedRecord;

pub use operation::{LogRecord, OperationFut, SimulatedLatency, SubmitOperation};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SubmissionState::Succeeded | SubmissionState::Failed)
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Submitting => "submitting",
            SubmissionState::Succeeded => "succeeded",
            SubmissionState::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Proof that this caller won the `Idle -> Submitting` transition.
#[derive(Debug)]
pub struct SubmissionTicket {
    id: Uuid,
    record: NormalizedRecord,
    started_at: DateTime<Utc>,
}

impl SubmissionTicket {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn record(&self) -> &NormalizedRecord {
        &self.record
    }
}

/// Terminal result of one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionOutcome {
    pub id: Uuid,
    pub state: SubmissionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SubmissionOutcome {
    pub fn succeeded(&self) -> bool {
        self.state == SubmissionState::Succeeded
    }
}

#[derive(Debug, Default)]
struct CoordinatorState {
    state: SubmissionState,
    in_flight: Option<Uuid>,
    last_outcome: Option<SubmissionOutcome>,
}

pub struct SubmissionCoordinator {
    form: &'static str,
    operation: Arc<dyn SubmitOperation>,
    templates: NotificationTemplates,
    inner: Mutex<CoordinatorState>,
}

impl fmt::Debug for SubmissionCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionCoordinator")
            .field("form", &self.form)
            .field("state", &self.state())
            .finish()
    }
}

impl SubmissionCoordinator {
    pub fn new(
        form: &'static str,
        operation: Arc<dyn SubmitOperation>,
        templates: NotificationTemplates,
    ) -> Self {
        Self {
            form,
            operation,
            templates,
            inner: Mutex::new(CoordinatorState::default()),
        }
    }

    pub fn form(&self) -> &'static str {
        self.form
    }

    pub fn state(&self) -> SubmissionState {
        self.lock().state
    }

    pub fn is_submitting(&self) -> bool {
        self.state() == SubmissionState::Submitting
    }

    /// Outcome of the most recent completed submission, if any.
    pub fn last_outcome(&self) -> Option<SubmissionOutcome> {
        self.lock().last_outcome.clone()
    }

    /// Moves `Idle -> Submitting` and hands out the ticket for `record`.
    /// Any other state makes this a no-op that returns `None`.
    pub fn begin(&self, record: NormalizedRecord) -> Option<SubmissionTicket> {
        let mut inner = self.lock();
        if inner.state != SubmissionState::Idle {
            tracing::debug!(
                form = self.form,
                state = %inner.state,
                "submission ignored, coordinator busy"
            );
            return None;
        }
        let ticket = SubmissionTicket {
            id: Uuid::new_v4(),
            record,
            started_at: Utc::now(),
        };
        inner.state = SubmissionState::Submitting;
        inner.in_flight = Some(ticket.id);
        tracing::info!(form = self.form, submission = %ticket.id, "submission started");
        Some(ticket)
    }

    /// Records the result of the operation behind `ticket` and moves
    /// `Submitting -> Succeeded | Failed`. Returns `None` when `ticket` is not
    /// the one in flight.
    pub fn complete(
        &self,
        ticket: SubmissionTicket,
        result: Result<(), SubmissionError>,
    ) -> Option<SubmissionOutcome> {
        let mut inner = self.lock();
        if inner.state != SubmissionState::Submitting || inner.in_flight != Some(ticket.id) {
            tracing::warn!(
                form = self.form,
                submission = %ticket.id,
                "completion for a submission that is not in flight"
            );
            return None;
        }

        let (state, notification, error) = match result {
            Ok(()) => {
                tracing::info!(form = self.form, submission = %ticket.id, "submission succeeded");
                (SubmissionState::Succeeded, self.templates.success.clone(), None)
            }
            Err(err) => {
                tracing::warn!(
                    form = self.form,
                    submission = %ticket.id,
                    error = %err,
                    "submission failed"
                );
                let notification = self.templates.failure.clone().map(|template| {
                    if template.description.is_some() {
                        template
                    } else {
                        template.with_description(err.message.clone())
                    }
                });
                (SubmissionState::Failed, notification, Some(err.message))
            }
        };

        let outcome = SubmissionOutcome {
            id: ticket.id,
            state,
            notification,
            error,
            started_at: ticket.started_at,
            finished_at: Utc::now(),
        };
        inner.state = state;
        inner.in_flight = None;
        inner.last_outcome = Some(outcome.clone());
        Some(outcome)
    }

    /// Moves a terminal state back to `Idle`. Returns whether anything
    /// changed; an in-flight submission is left alone.
    pub fn acknowledge(&self) -> bool {
        let mut inner = self.lock();
        match inner.state {
            state if state.is_terminal() => {
                inner.state = SubmissionState::Idle;
                tracing::debug!(form = self.form, "submission acknowledged");
                true
            }
            SubmissionState::Submitting => {
                tracing::debug!(form = self.form, "acknowledge ignored while submitting");
                false
            }
            _ => false,
        }
    }

    /// Runs the operation for an issued ticket and completes it.
    pub async fn perform(&self, ticket: SubmissionTicket) -> Option<SubmissionOutcome> {
        let result = self.operation.perform(&ticket.record).await;
        self.complete(ticket, result)
    }

    /// `begin` followed by `perform`. Returns `None` without doing any work
    /// when the coordinator is not idle.
    pub async fn submit(&self, record: NormalizedRecord) -> Option<SubmissionOutcome> {
        let ticket = self.begin(record)?;
        self.perform(ticket).await
    }

    fn lock(&self) -> MutexGuard<'_, CoordinatorState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
