use thiserror::Error;

/// Error type for misuse of the form API and for configuration I/O.
///
/// Validation failures are not errors: they travel inside
/// [`crate::schema::ValidationResult::Rejected`].
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Field is read-only: {0}")]
    ReadOnlyField(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Failure reported by the external operation behind a submission.
///
/// Every failure is handled the same way by the coordinator, so the type only
/// carries a message for logs and notification descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubmissionError {
    pub message: String,
}

impl SubmissionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
