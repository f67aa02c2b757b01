use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::errors::SubmissionError;
use crate::schema::NormalizedRecord;

/// Future returned by [`SubmitOperation::perform`].
pub type OperationFut<'a> = Pin<Box<dyn Future<Output = Result<(), SubmissionError>> + Send + 'a>>;

/// Side-effecting call made once a record has been accepted, e.g. an API
/// request that changes the password.
pub trait SubmitOperation: Send + Sync {
    fn perform<'a>(&'a self, record: &'a NormalizedRecord) -> OperationFut<'a>;
}

/// Stand-in for a network call: waits for `delay`, then succeeds, or fails
/// when built with [`SimulatedLatency::failing`].
#[derive(Debug, Clone)]
pub struct SimulatedLatency {
    delay: Duration,
    fail: bool,
}

impl SimulatedLatency {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

    pub fn new(delay: Duration) -> Self {
        Self { delay, fail: false }
    }

    pub fn failing(delay: Duration) -> Self {
        Self { delay, fail: true }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedLatency {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

impl SubmitOperation for SimulatedLatency {
    fn perform<'a>(&'a self, _record: &'a NormalizedRecord) -> OperationFut<'a> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            if self.fail {
                Err(SubmissionError::new("simulated failure"))
            } else {
                Ok(())
            }
        })
    }
}

/// Writes the accepted record to the log and succeeds immediately.
#[derive(Debug, Clone)]
pub struct LogRecord {
    form: &'static str,
}

impl LogRecord {
    pub fn new(form: &'static str) -> Self {
        Self { form }
    }
}

impl SubmitOperation for LogRecord {
    fn perform<'a>(&'a self, record: &'a NormalizedRecord) -> OperationFut<'a> {
        Box::pin(async move {
            let payload = serde_json::to_string(record)
                .map_err(|err| SubmissionError::new(err.to_string()))?;
            tracing::info!(form = self.form, record = %payload, "form submitted");
            Ok(())
        })
    }
}
