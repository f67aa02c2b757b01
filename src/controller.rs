//! Form state: current values, the last validation errors and the
//! touched/dirty flags.
//!
//! Validation only runs on [`FormController::attempt_submit`]; editing a field
//! never clears or recomputes errors by itself.

use std::collections::BTreeSet;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::errors::FormError;
use crate::forms::FormModel;
use crate::schema::{validate, FieldErrors, FormValues, ValidationResult};
use crate::submission::{SubmissionCoordinator, SubmissionTicket};

pub struct FormController<M: FormModel> {
    initial: FormValues,
    values: FormValues,
    errors: FieldErrors,
    touched: BTreeSet<&'static str>,
    coordinator: Arc<SubmissionCoordinator>,
    ticket: Option<SubmissionTicket>,
    _model: PhantomData<M>,
}

impl<M: FormModel> FormController<M> {
    pub fn new(defaults: &M, coordinator: Arc<SubmissionCoordinator>) -> Result<Self, FormError> {
        let initial = defaults.to_values()?;
        Ok(Self {
            values: initial.clone(),
            initial,
            errors: FieldErrors::default(),
            touched: BTreeSet::new(),
            coordinator,
            ticket: None,
            _model: PhantomData,
        })
    }

    /// Updates one field. Unknown and read-only fields are refused and leave
    /// the values unchanged.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let field = M::schema()
            .field(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        if field.read_only {
            return Err(FormError::ReadOnlyField(name.to_string()));
        }
        self.values.set(field.name, value)?;
        self.touched.insert(field.name);
        Ok(())
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name)
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    /// Whether any value differs from the defaults the form started with.
    pub fn is_dirty(&self) -> bool {
        self.values != self.initial
    }

    /// The typed record for the current values.
    pub fn model(&self) -> M {
        M::from_values(&self.values)
    }

    pub fn coordinator(&self) -> &Arc<SubmissionCoordinator> {
        &self.coordinator
    }

    /// Validates the current values.
    ///
    /// A rejection is stored for [`FormController::errors`] and nothing is
    /// submitted. An acceptance clears the errors and asks the coordinator
    /// to begin a submission; while one is already in flight the request is
    /// dropped, so repeated calls never queue a second submission. The
    /// issued ticket is held until [`FormController::take_ticket`].
    pub fn attempt_submit(&mut self) -> ValidationResult {
        let result = validate(M::schema(), &self.values);
        match &result {
            ValidationResult::Rejected(errors) => {
                tracing::debug!(
                    form = M::schema().name,
                    failing = errors.len(),
                    "validation rejected submission"
                );
                self.errors = errors.clone();
            }
            ValidationResult::Accepted(record) => {
                self.errors = FieldErrors::default();
                if self.ticket.is_none() {
                    self.ticket = self.coordinator.begin(record.clone());
                }
            }
        }
        result
    }

    pub fn take_ticket(&mut self) -> Option<SubmissionTicket> {
        self.ticket.take()
    }

    /// Restores the defaults and clears errors and touched flags.
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.errors = FieldErrors::default();
        self.touched.clear();
    }
}
