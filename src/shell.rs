//! Page and dialog wrappers around a form.
//!
//! The shell owns visibility (the `open` flag for dialogs), turns submission
//! outcomes into notifications and derives the submit control's label and
//! disabled flag from the coordinator state.

use std::sync::Arc;

use crate::controller::FormController;
use crate::errors::FormError;
use crate::forms::FormModel;
use crate::notify::Notifier;
use crate::schema::{FieldErrors, ValidationResult};
use crate::submission::{SubmissionCoordinator, SubmissionOutcome, SubmissionState, SubmitOperation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Always visible.
    Page,
    /// Hidden until opened; closes itself after a successful submission.
    Dialog,
}

/// Static text shown around a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCopy {
    pub title: &'static str,
    pub description: Option<&'static str>,
    /// Button that opens a dialog.
    pub trigger_label: Option<&'static str>,
    pub submit_label: &'static str,
    /// Label while a submission is in flight; forms without one keep
    /// `submit_label`.
    pub busy_label: Option<&'static str>,
}

impl ShellCopy {
    pub fn submit_label(&self, state: SubmissionState) -> &'static str {
        match (state, self.busy_label) {
            (SubmissionState::Submitting, Some(busy)) => busy,
            _ => self.submit_label,
        }
    }
}

pub fn submit_disabled(state: SubmissionState) -> bool {
    state == SubmissionState::Submitting
}

/// What a submit trigger led to.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitAttempt {
    /// Validation failed; errors are shown inline.
    Rejected(FieldErrors),
    /// Hidden dialog, or a submission already in flight.
    Ignored,
    Completed(SubmissionOutcome),
}

pub struct FormShell<M: FormModel> {
    controller: FormController<M>,
    coordinator: Arc<SubmissionCoordinator>,
    notifier: Arc<dyn Notifier>,
    open: bool,
}

impl<M: FormModel> FormShell<M> {
    /// Builds the form with its default record. Dialogs start closed.
    pub fn new(
        operation: Arc<dyn SubmitOperation>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, FormError> {
        let coordinator = Arc::new(SubmissionCoordinator::new(
            M::schema().name,
            operation,
            M::notifications(),
        ));
        let controller = FormController::new(&M::default(), coordinator.clone())?;
        Ok(Self {
            controller,
            coordinator,
            notifier,
            open: M::presentation() == Presentation::Page,
        })
    }

    pub fn copy(&self) -> &'static ShellCopy {
        M::copy()
    }

    pub fn presentation(&self) -> Presentation {
        M::presentation()
    }

    pub fn controller(&self) -> &FormController<M> {
        &self.controller
    }

    /// Shared handle for observers, e.g. a renderer polling the state while
    /// [`FormShell::submit`] is awaiting.
    pub fn coordinator(&self) -> Arc<SubmissionCoordinator> {
        self.coordinator.clone()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Mount hook: fresh default values and an idle coordinator.
    pub fn mount(&mut self) {
        self.controller.reset();
        self.coordinator.acknowledge();
    }

    /// Unmount hook. Values are dropped with the form, so they are reset too.
    pub fn unmount(&mut self) {
        self.mount();
        if M::presentation() == Presentation::Dialog {
            self.open = false;
        }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Hides a dialog. Typed values survive; a finished submission is
    /// acknowledged. Pages cannot be closed.
    pub fn close(&mut self) {
        if M::presentation() == Presentation::Dialog {
            self.open = false;
            self.coordinator.acknowledge();
        }
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        self.controller.set_field(name, value)
    }

    pub fn submit_label(&self) -> &'static str {
        M::copy().submit_label(self.coordinator.state())
    }

    pub fn submit_disabled(&self) -> bool {
        submit_disabled(self.coordinator.state())
    }

    /// Validates, submits, notifies and acknowledges.
    ///
    /// On success the values go back to their defaults and a dialog closes.
    /// On failure every value is kept so the user can retry.
    pub async fn submit(&mut self) -> SubmitAttempt {
        if !self.open {
            tracing::debug!(form = M::schema().name, "submit ignored while closed");
            return SubmitAttempt::Ignored;
        }
        if let ValidationResult::Rejected(errors) = self.controller.attempt_submit() {
            return SubmitAttempt::Rejected(errors);
        }
        let Some(ticket) = self.controller.take_ticket() else {
            tracing::debug!(form = M::schema().name, "submit ignored while busy");
            return SubmitAttempt::Ignored;
        };
        let Some(outcome) = self.coordinator.perform(ticket).await else {
            return SubmitAttempt::Ignored;
        };

        if let Some(notification) = &outcome.notification {
            self.notifier.notify(notification);
        }
        if outcome.succeeded() {
            self.controller.reset();
            if M::presentation() == Presentation::Dialog {
                self.open = false;
            }
        }
        self.coordinator.acknowledge();
        SubmitAttempt::Completed(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{ChangePasswordForm, LoginForm, SettingsForm};

    #[test]
    fn busy_label_only_while_submitting() {
        let copy = ChangePasswordForm::copy();
        assert_eq!(copy.submit_label(SubmissionState::Idle), "Salvar Senha");
        assert_eq!(copy.submit_label(SubmissionState::Submitting), "Salvando...");
        assert_eq!(copy.submit_label(SubmissionState::Failed), "Salvar Senha");

        let copy = LoginForm::copy();
        assert_eq!(copy.submit_label(SubmissionState::Submitting), "Processando...");
        assert_eq!(copy.submit_label(SubmissionState::Succeeded), "Iniciar Sessão");
    }

    #[test]
    fn forms_without_busy_label_keep_the_default() {
        let copy = SettingsForm::copy();
        assert_eq!(copy.submit_label(SubmissionState::Submitting), "Salvar");
    }

    #[test]
    fn only_submitting_disables_the_control() {
        assert!(submit_disabled(SubmissionState::Submitting));
        assert!(!submit_disabled(SubmissionState::Idle));
        assert!(!submit_disabled(SubmissionState::Succeeded));
        assert!(!submit_disabled(SubmissionState::Failed));
    }
}
