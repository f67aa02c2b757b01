#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_cmd::Command;
use form_core::{
    notify::{Notifier, RecordingNotifier},
    submission::{SimulatedLatency, SubmitOperation},
    FormModel, FormShell,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Mounted shell wired to a recording notifier.
pub fn shell_with<M: FormModel>(
    operation: impl SubmitOperation + 'static,
) -> (FormShell<M>, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let sink: Arc<dyn Notifier> = notifier.clone();
    let mut shell = FormShell::<M>::new(Arc::new(operation), sink).expect("build shell");
    shell.mount();
    (shell, notifier)
}

/// Same as [`shell_with`] with the default one second simulated call.
pub fn shell<M: FormModel>() -> (FormShell<M>, Arc<RecordingNotifier>) {
    shell_with(SimulatedLatency::default())
}

pub fn failing() -> SimulatedLatency {
    SimulatedLatency::failing(Duration::from_millis(50))
}

/// CLI invocation in script mode with an isolated config home and no
/// simulated latency.
pub fn script_cmd(screen: &str) -> Command {
    let temp = TempDir::new().expect("create temp dir");
    let home = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let mut cmd = Command::cargo_bin("form_core_cli").expect("binary built");
    cmd.arg(screen)
        .env("FORM_CORE_CLI_SCRIPT", "1")
        .env("FORM_CORE_HOME", home)
        .env("FORM_CORE_LATENCY_MS", "0")
        .env_remove("FORM_CORE_SIMULATE_FAILURE")
        .env("NO_COLOR", "1");
    cmd
}
