use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password};
use tokio::runtime::Runtime;

use crate::cli::{display_value, output, submit_with_status, CliError};
use crate::forms::FormModel;
use crate::schema::{FieldSchema, InputKind};
use crate::shell::{FormShell, Presentation, SubmitAttempt};

/// Prompts for every editable field, submits, and re-prompts only the
/// fields that failed validation until the submission completes or the
/// user gives up.
pub(crate) fn run<M: FormModel>(
    shell: &mut FormShell<M>,
    runtime: &Runtime,
) -> Result<(), CliError> {
    let theme = ColorfulTheme::default();
    let copy = shell.copy();

    if shell.presentation() == Presentation::Dialog {
        let trigger = copy.trigger_label.unwrap_or(copy.title);
        if !Confirm::with_theme(&theme)
            .with_prompt(trigger)
            .default(true)
            .interact()?
        {
            return Ok(());
        }
        shell.open();
        output::section(copy.title);
        if let Some(description) = copy.description {
            output::info(description);
        }
    }

    let mut only_failing = false;
    loop {
        for field in &M::schema().fields {
            let current = shell
                .controller()
                .values()
                .get(field.name)
                .unwrap_or_default()
                .to_string();
            if field.read_only {
                output::info(format!(
                    "{}: {}",
                    field.display_label(),
                    display_value(field.kind, &current)
                ));
                continue;
            }
            let error = shell.controller().error(field.name).map(str::to_string);
            if only_failing && error.is_none() {
                continue;
            }
            if let Some(message) = error {
                output::warning(format!("{}: {}", field.display_label(), message));
            }
            let value = prompt_field(&theme, field, &current)?;
            shell.set_field(field.name, value)?;
        }

        match submit_with_status(shell, runtime) {
            SubmitAttempt::Rejected(_) => only_failing = true,
            SubmitAttempt::Ignored => {
                output::warning("Submission ignored.");
                return Ok(());
            }
            SubmitAttempt::Completed(outcome) if outcome.succeeded() => return Ok(()),
            SubmitAttempt::Completed(_) => {
                let retry = Confirm::with_theme(&theme)
                    .with_prompt("Tentar novamente?")
                    .default(true)
                    .interact()?;
                if !retry {
                    shell.close();
                    return Ok(());
                }
                only_failing = false;
            }
        }
    }
}

fn prompt_field(
    theme: &ColorfulTheme,
    field: &FieldSchema,
    current: &str,
) -> Result<String, CliError> {
    let label = field.display_label();
    let value = match field.kind {
        InputKind::Password => Password::with_theme(theme)
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()?,
        InputKind::Text | InputKind::Email => Input::<String>::with_theme(theme)
            .with_prompt(label)
            .with_initial_text(current)
            .allow_empty(true)
            .interact_text()?,
    };
    Ok(value)
}
