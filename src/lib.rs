#![doc(test(attr(deny(warnings))))]

//! Form Core provides the validation and submission state machine behind the
//! account screens (settings page, change password dialog and login page),
//! plus a terminal front end that drives them.

pub mod cli;
pub mod config;
pub mod controller;
pub mod errors;
pub mod forms;
pub mod notify;
pub mod schema;
pub mod shell;
pub mod submission;
pub mod utils;

use std::sync::Once;

pub use controller::FormController;
pub use errors::{FormError, SubmissionError};
pub use forms::{ChangePasswordForm, FormModel, LoginForm, SettingsForm};
pub use schema::{validate, ValidationResult};
pub use shell::{FormShell, SubmitAttempt};
pub use submission::{SubmissionCoordinator, SubmissionState};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Form Core tracing initialized.");
    });
}
