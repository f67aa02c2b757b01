use std::io::BufRead;

use shell_words::split;
use tokio::runtime::Runtime;

use crate::cli::{display_value, output, submit_with_status, suggest, CliError};
use crate::errors::FormError;
use crate::forms::FormModel;
use crate::schema::FieldErrors;
use crate::shell::{FormShell, SubmitAttempt};

enum LoopControl {
    Continue,
    Exit,
}

/// Runs newline-separated commands against `shell`.
///
/// Commands: `open`, `close`, `set <field> <value>`, `submit`, `show`,
/// `errors`, `state`, `exit`. Blank lines and `#` comments are skipped.
/// Command mistakes are reported as warnings and do not stop the script.
pub fn run_script<M: FormModel>(
    shell: &mut FormShell<M>,
    runtime: &Runtime,
    input: impl BufRead,
) -> Result<(), CliError> {
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let tokens = match split(trimmed) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                continue;
            }
        };
        if let LoopControl::Exit = handle(shell, runtime, &tokens)? {
            break;
        }
    }
    Ok(())
}

fn handle<M: FormModel>(
    shell: &mut FormShell<M>,
    runtime: &Runtime,
    tokens: &[String],
) -> Result<LoopControl, CliError> {
    let Some((command, args)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };

    match command.to_ascii_lowercase().as_str() {
        "open" => {
            shell.open();
            output::section(shell.copy().title);
            if let Some(description) = shell.copy().description {
                output::info(description);
            }
        }
        "close" => {
            shell.close();
            output::info(format!("open: {}", shell.is_open()));
        }
        "set" => match args {
            [name, rest @ ..] => set_field(shell, name, &rest.join(" "))?,
            [] => output::warning("usage: set <field> <value>"),
        },
        "submit" => {
            let attempt = submit_with_status(shell, runtime);
            report(shell, attempt);
        }
        "show" => show(shell),
        "errors" => print_errors(shell.controller().errors()),
        "state" => output::info(format!(
            "state: {} | submit: {}{}",
            shell.coordinator().state(),
            shell.submit_label(),
            if shell.submit_disabled() { " (disabled)" } else { "" }
        )),
        "exit" | "quit" => return Ok(LoopControl::Exit),
        other => output::warning(format!("Unknown command `{other}`.")),
    }
    Ok(LoopControl::Continue)
}

fn set_field<M: FormModel>(
    shell: &mut FormShell<M>,
    name: &str,
    value: &str,
) -> Result<(), CliError> {
    match shell.set_field(name, value) {
        Ok(()) => Ok(()),
        Err(FormError::UnknownField(_)) => {
            let hint = suggest(name, M::schema().field_names())
                .map(|best| format!(" Did you mean `{best}`?"))
                .unwrap_or_default();
            output::warning(format!("Unknown field `{name}`.{hint}"));
            Ok(())
        }
        Err(FormError::ReadOnlyField(_)) => {
            output::warning(format!("Field `{name}` is read-only."));
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn report<M: FormModel>(shell: &FormShell<M>, attempt: SubmitAttempt) {
    match attempt {
        SubmitAttempt::Rejected(errors) => print_errors(&errors),
        SubmitAttempt::Ignored => output::warning("Submission ignored."),
        SubmitAttempt::Completed(outcome) => {
            output::info(format!("submission {}: {}", outcome.id, outcome.state));
            output::info(format!("open: {}", shell.is_open()));
        }
    }
}

fn show<M: FormModel>(shell: &FormShell<M>) {
    let values = shell.controller().values();
    for field in &M::schema().fields {
        let value = values.get(field.name).unwrap_or_default();
        let mut line = format!("{} = {}", field.name, display_value(field.kind, value));
        if field.read_only {
            line.push_str(" (read-only)");
        }
        println!("{line}");
    }
}

fn print_errors(errors: &FieldErrors) {
    if errors.is_empty() {
        output::info("No validation errors.");
        return;
    }
    for (field, message) in errors.iter() {
        output::warning(format!("{field}: {message}"));
    }
}
