//! Terminal front end for the account forms.
//!
//! Interactive mode prompts with dialoguer. Script mode, selected by setting
//! `FORM_CORE_CLI_SCRIPT`, reads one command per line from stdin.

mod interactive;
pub mod output;
mod script;

use std::io;
use std::str::FromStr;
use std::sync::Arc;

use strsim::levenshtein;
use tokio::runtime::Runtime;

use crate::config::{Config, ConfigManager};
use crate::errors::FormError;
use crate::forms::{ChangePasswordForm, FormModel, LoginForm, SettingsForm};
use crate::schema::InputKind;
use crate::shell::{FormShell, Presentation, SubmitAttempt};
use crate::submission::{LogRecord, SubmitOperation};

pub use script::run_script;

pub const SCRIPT_ENV: &str = "FORM_CORE_CLI_SCRIPT";
pub const BRAND: &str = "MonstroX";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Settings,
    ChangePassword,
    Login,
}

impl Screen {
    pub const ALL: [Screen; 3] = [Screen::Settings, Screen::ChangePassword, Screen::Login];

    pub fn command(self) -> &'static str {
        match self {
            Screen::Settings => "settings",
            Screen::ChangePassword => "change-password",
            Screen::Login => "login",
        }
    }
}

impl FromStr for Screen {
    type Err = CliError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_ascii_lowercase();
        Screen::ALL
            .into_iter()
            .find(|screen| screen.command() == normalized)
            .ok_or_else(|| {
                let hint = suggest(&normalized, Screen::ALL.iter().map(|s| s.command()))
                    .map(|best| format!(" (did you mean `{best}`?)"))
                    .unwrap_or_default();
                CliError::InvalidArguments(format!("unknown screen `{input}`{hint}"))
            })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
}

/// Loads configuration, builds the requested screen and drives it until the
/// user is done.
pub fn run_cli(screen: Screen) -> Result<(), CliError> {
    let mut config = ConfigManager::new()?.load()?;
    config.apply_env();
    output::set_preferences(output::OutputPreferences {
        quiet_mode: config.quiet,
    });

    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    tracing::debug!(screen = screen.command(), ?mode, "starting form screen");
    match screen {
        Screen::Settings => drive::<SettingsForm>(
            mode,
            Arc::new(LogRecord::new(SettingsForm::schema().name)),
            &runtime,
        ),
        Screen::ChangePassword => {
            drive::<ChangePasswordForm>(mode, operation(&config), &runtime)
        }
        Screen::Login => drive::<LoginForm>(mode, operation(&config), &runtime),
    }
}

fn operation(config: &Config) -> Arc<dyn SubmitOperation> {
    Arc::new(config.operation())
}

fn drive<M: FormModel>(
    mode: CliMode,
    operation: Arc<dyn SubmitOperation>,
    runtime: &Runtime,
) -> Result<(), CliError> {
    let mut shell = FormShell::<M>::new(operation, Arc::new(output::ConsoleNotifier))?;
    shell.mount();

    output::info(BRAND);
    let copy = shell.copy();
    if shell.presentation() == Presentation::Page {
        output::section(copy.title);
    } else if let Some(trigger) = copy.trigger_label {
        output::info(format!("[{trigger}]"));
    }

    match mode {
        CliMode::Interactive => interactive::run(&mut shell, runtime),
        CliMode::Script => {
            let stdin = io::stdin();
            run_script(&mut shell, runtime, stdin.lock())
        }
    }
}

/// Submits through the shell while a watcher reports the busy label once the
/// coordinator enters `Submitting`.
fn submit_with_status<M: FormModel>(shell: &mut FormShell<M>, runtime: &Runtime) -> SubmitAttempt {
    let coordinator = shell.coordinator();
    let copy = shell.copy();
    runtime.block_on(async {
        let watcher = async {
            tokio::task::yield_now().await;
            if coordinator.is_submitting() {
                output::info(copy.submit_label(coordinator.state()));
            }
        };
        let (attempt, ()) = tokio::join!(shell.submit(), watcher);
        attempt
    })
}

/// Value as it may be echoed back: password fields are masked.
fn display_value(kind: InputKind, value: &str) -> String {
    match kind {
        InputKind::Password => "*".repeat(value.chars().count()),
        InputKind::Text | InputKind::Email => value.to_string(),
    }
}

/// Closest candidate within an edit distance of 3.
fn suggest<'a>(input: &str, candidates: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    candidates
        .map(|candidate| (levenshtein(candidate, input), candidate))
        .filter(|(distance, _)| *distance <= 3)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}
