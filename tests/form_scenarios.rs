mod common;

use std::time::Duration;

use common::{failing, shell, shell_with};
use form_core::{
    forms::{
        change_password::{CONFIRM_PASSWORD, CURRENT_PASSWORD, NEW_PASSWORD},
        login, settings,
    },
    notify::NotificationKind,
    schema::FormValues,
    submission::SimulatedLatency,
    validate, ChangePasswordForm, FormModel, LoginForm, SettingsForm, SubmissionState,
    SubmitAttempt, ValidationResult,
};

fn fill_change_password(
    shell: &mut form_core::FormShell<ChangePasswordForm>,
    current: &str,
    new: &str,
    confirm: &str,
) {
    shell.set_field(CURRENT_PASSWORD, current).unwrap();
    shell.set_field(NEW_PASSWORD, new).unwrap();
    shell.set_field(CONFIRM_PASSWORD, confirm).unwrap();
}

#[tokio::test(start_paused = true)]
async fn change_password_success_resets_and_closes_dialog() {
    let (mut shell, notifier) = shell::<ChangePasswordForm>();
    assert!(!shell.is_open());
    shell.open();
    fill_change_password(&mut shell, "old", "secret", "secret");

    let started = tokio::time::Instant::now();
    let attempt = shell.submit().await;
    assert!(started.elapsed() >= SimulatedLatency::DEFAULT_DELAY);

    match attempt {
        SubmitAttempt::Completed(outcome) => {
            assert!(outcome.succeeded());
            assert!(outcome.error.is_none());
        }
        other => panic!("expected completion, got {other:?}"),
    }

    let received = notifier.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].kind, NotificationKind::Success);
    assert_eq!(received[0].message, "Senha alterada com sucesso!");
    assert_eq!(
        received[0].description.as_deref(),
        Some("Sua senha foi atualizada.")
    );

    assert!(!shell.is_open());
    for name in [CURRENT_PASSWORD, NEW_PASSWORD, CONFIRM_PASSWORD] {
        assert_eq!(shell.controller().values().get(name), Some(""));
    }
    assert_eq!(shell.coordinator().state(), SubmissionState::Idle);
    assert_eq!(shell.submit_label(), "Salvar Senha");
}

#[tokio::test(start_paused = true)]
async fn busy_label_is_shown_while_the_call_is_pending() {
    let (mut shell, _notifier) = shell::<ChangePasswordForm>();
    shell.open();
    fill_change_password(&mut shell, "old", "secret", "secret");

    let coordinator = shell.coordinator();
    let copy = ChangePasswordForm::copy();
    let watcher = async {
        tokio::task::yield_now().await;
        (
            coordinator.state(),
            copy.submit_label(coordinator.state()),
            form_core::shell::submit_disabled(coordinator.state()),
        )
    };
    let (attempt, (state, label, disabled)) = tokio::join!(shell.submit(), watcher);

    assert_eq!(state, SubmissionState::Submitting);
    assert_eq!(label, "Salvando...");
    assert!(disabled);
    assert!(matches!(attempt, SubmitAttempt::Completed(_)));
    assert!(!shell.submit_disabled());
}

#[tokio::test]
async fn mismatched_confirmation_never_reaches_the_operation() {
    let (mut shell, notifier) = shell::<ChangePasswordForm>();
    shell.open();
    fill_change_password(&mut shell, "old", "secret", "secre7");

    match shell.submit().await {
        SubmitAttempt::Rejected(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors.get(CONFIRM_PASSWORD), Some("As senhas não coincidem"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }

    assert!(notifier.received().is_empty());
    assert!(shell.coordinator().last_outcome().is_none());
    assert_eq!(shell.coordinator().state(), SubmissionState::Idle);
    assert!(shell.is_open());
    assert_eq!(
        shell.controller().error(CONFIRM_PASSWORD),
        Some("As senhas não coincidem")
    );
}

#[tokio::test]
async fn short_new_password_skips_the_mismatch_check() {
    let (mut shell, _notifier) = shell::<ChangePasswordForm>();
    shell.open();
    fill_change_password(&mut shell, "old", "abc", "abd");

    let errors = match shell.submit().await {
        SubmitAttempt::Rejected(errors) => errors,
        other => panic!("expected rejection, got {other:?}"),
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.get(NEW_PASSWORD),
        Some("Nova senha deve ter pelo menos 6 caracteres")
    );
    assert!(!errors.contains(CONFIRM_PASSWORD));
}

#[tokio::test(start_paused = true)]
async fn failed_change_password_keeps_values_for_retry() {
    let (mut shell, notifier) = shell_with::<ChangePasswordForm>(failing());
    shell.open();
    fill_change_password(&mut shell, "old", "secret", "secret");

    match shell.submit().await {
        SubmitAttempt::Completed(outcome) => {
            assert_eq!(outcome.state, SubmissionState::Failed);
            assert_eq!(outcome.error.as_deref(), Some("simulated failure"));
        }
        other => panic!("expected completion, got {other:?}"),
    }

    let received = notifier.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].kind, NotificationKind::Failure);
    assert_eq!(received[0].to_string(), "Erro ao alterar senha (Tente novamente mais tarde.)");

    assert!(shell.is_open());
    assert_eq!(shell.controller().values().get(NEW_PASSWORD), Some("secret"));
    assert_eq!(shell.coordinator().state(), SubmissionState::Idle);

    // The retry goes through the same path and fails the same way.
    assert!(matches!(shell.submit().await, SubmitAttempt::Completed(_)));
    assert_eq!(notifier.received().len(), 2);
}

#[tokio::test]
async fn closed_dialog_ignores_submit() {
    let (mut shell, notifier) = shell::<ChangePasswordForm>();
    fill_change_password(&mut shell, "old", "secret", "secret");

    assert!(matches!(shell.submit().await, SubmitAttempt::Ignored));
    assert!(notifier.received().is_empty());
    assert_eq!(shell.coordinator().state(), SubmissionState::Idle);
}

#[tokio::test]
async fn closing_the_dialog_keeps_typed_values() {
    let (mut shell, _notifier) = shell::<ChangePasswordForm>();
    shell.open();
    shell.set_field(CURRENT_PASSWORD, "old").unwrap();
    shell.close();
    shell.open();
    assert_eq!(shell.controller().values().get(CURRENT_PASSWORD), Some("old"));

    shell.unmount();
    assert_eq!(shell.controller().values().get(CURRENT_PASSWORD), Some(""));
}

#[tokio::test]
async fn login_reports_only_the_email_error() {
    let (mut shell, notifier) = shell::<LoginForm>();
    assert!(shell.is_open());
    shell.set_field(login::EMAIL, "not-an-email").unwrap();
    shell.set_field(login::PASSWORD, "123456").unwrap();

    let errors = match shell.submit().await {
        SubmitAttempt::Rejected(errors) => errors,
        other => panic!("expected rejection, got {other:?}"),
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get(login::EMAIL), Some("Formato de email inválido"));
    assert!(notifier.received().is_empty());
}

#[tokio::test(start_paused = true)]
async fn login_success_keeps_the_page_open() {
    let (mut shell, notifier) = shell::<LoginForm>();
    shell.set_field(login::EMAIL, "john.doe@email.com").unwrap();
    shell.set_field(login::PASSWORD, "123456").unwrap();

    assert!(matches!(shell.submit().await, SubmitAttempt::Completed(ref o) if o.succeeded()));
    assert!(shell.is_open());

    let received = notifier.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].to_string(), "Login realizado com sucesso!");
    assert_eq!(shell.controller().values().get(login::EMAIL), Some(""));
}

#[tokio::test(start_paused = true)]
async fn failed_login_falls_back_to_the_error_message() {
    let (mut shell, notifier) = shell_with::<LoginForm>(failing());
    shell.set_field(login::EMAIL, "john.doe@email.com").unwrap();
    shell.set_field(login::PASSWORD, "123456").unwrap();

    assert!(matches!(shell.submit().await, SubmitAttempt::Completed(_)));
    let received = notifier.received();
    assert_eq!(received[0].message, "Erro ao fazer login");
    assert_eq!(received[0].description.as_deref(), Some("simulated failure"));
    assert_eq!(shell.controller().values().get(login::PASSWORD), Some("123456"));
}

#[test]
fn settings_requires_a_name() {
    let values = FormValues::from_pairs(
        SettingsForm::schema(),
        [(settings::NAME, ""), (settings::EMAIL, "x@y.com")],
    )
    .unwrap();

    match validate(SettingsForm::schema(), &values) {
        ValidationResult::Rejected(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors.get(settings::NAME), Some("Nome obrigatório"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn settings_email_cannot_be_edited() {
    let (mut shell, _notifier) = shell_with::<SettingsForm>(SimulatedLatency::new(Duration::ZERO));
    assert!(shell.set_field(settings::EMAIL, "other@y.com").is_err());
    assert_eq!(
        shell.controller().values().get(settings::EMAIL),
        Some(settings::PLACEHOLDER_EMAIL)
    );

    shell.set_field(settings::NAME, "Ana").unwrap();
    assert!(matches!(shell.submit().await, SubmitAttempt::Completed(ref o) if o.succeeded()));
    assert_eq!(shell.submit_label(), "Salvar");
}

#[test]
fn required_fields_reject_blank_input() {
    let cases: [(&form_core::schema::FormSchema, &str); 4] = [
        (ChangePasswordForm::schema(), CURRENT_PASSWORD),
        (ChangePasswordForm::schema(), CONFIRM_PASSWORD),
        (SettingsForm::schema(), settings::NAME),
        (LoginForm::schema(), login::PASSWORD),
    ];
    for (schema, field) in cases {
        for blank in ["", "   ", "\t"] {
            let mut values = FormValues::empty(schema);
            values.set(field, blank).unwrap();
            let result = validate(schema, &values);
            let errors = result.errors().expect("blank input is rejected");
            assert!(errors.contains(field), "{field} accepted {blank:?}");
        }
    }
}

#[test]
fn validation_is_deterministic() {
    let values = FormValues::from_pairs(
        ChangePasswordForm::schema(),
        [
            (CURRENT_PASSWORD, "old"),
            (NEW_PASSWORD, "secret"),
            (CONFIRM_PASSWORD, "other!"),
        ],
    )
    .unwrap();

    let first = validate(ChangePasswordForm::schema(), &values);
    let second = validate(ChangePasswordForm::schema(), &values);
    assert_eq!(first, second);
}

#[test]
fn astral_characters_count_twice_towards_password_length() {
    let values = FormValues::from_pairs(
        ChangePasswordForm::schema(),
        [
            (CURRENT_PASSWORD, "a"),
            (NEW_PASSWORD, "😀😀😀"),
            (CONFIRM_PASSWORD, "😀😀😀"),
        ],
    )
    .unwrap();
    assert!(validate(ChangePasswordForm::schema(), &values).is_accepted());
}

#[test]
fn login_email_rejects_non_ascii_case_folds() {
    for email in ["x@y.\u{212A}z", "x@y.co\u{17F}"] {
        let values = FormValues::from_pairs(
            LoginForm::schema(),
            [(login::EMAIL, email), (login::PASSWORD, "123456")],
        )
        .unwrap();
        let result = validate(LoginForm::schema(), &values);
        let errors = result.errors().expect("rejected");
        assert_eq!(errors.get(login::EMAIL), Some("Formato de email inválido"));
    }
}
