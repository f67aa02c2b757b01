use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::forms::{FieldBinding, FormModel};
use crate::notify::{Notification, NotificationTemplates};
use crate::schema::{FieldSchema, FormSchema, InputKind, Rule};
use crate::shell::ShellCopy;

pub const EMAIL: &str = "email";
pub const PASSWORD: &str = "password";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

fn email(form: &LoginForm) -> &str {
    &form.email
}

fn set_email(form: &mut LoginForm, value: String) {
    form.email = value;
}

fn password(form: &LoginForm) -> &str {
    &form.password
}

fn set_password(form: &mut LoginForm, value: String) {
    form.password = value;
}

static BINDINGS: [FieldBinding<LoginForm>; 2] = [
    FieldBinding {
        name: EMAIL,
        get: email,
        set: set_email,
    },
    FieldBinding {
        name: PASSWORD,
        get: password,
        set: set_password,
    },
];

static COPY: ShellCopy = ShellCopy {
    title: "Bem vindo de volta!",
    description: None,
    trigger_label: None,
    submit_label: "Iniciar Sessão",
    busy_label: Some("Processando..."),
};

impl FormModel for LoginForm {
    fn schema() -> &'static FormSchema {
        static SCHEMA: OnceLock<FormSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            FormSchema::new(
                "login",
                vec![
                    FieldSchema::new(
                        EMAIL,
                        InputKind::Email,
                        vec![Rule::email("Formato de email inválido")],
                    )
                    .with_placeholder("john.doe@email.com"),
                    FieldSchema::new(
                        PASSWORD,
                        InputKind::Password,
                        vec![Rule::min_length(
                            6,
                            "A senha deve ter pelo menos 6 caracteres",
                        )],
                    )
                    .with_placeholder("********"),
                ],
            )
        })
    }

    fn bindings() -> &'static [FieldBinding<Self>] {
        &BINDINGS
    }

    fn copy() -> &'static ShellCopy {
        &COPY
    }

    fn notifications() -> NotificationTemplates {
        NotificationTemplates {
            success: Some(Notification::success("Login realizado com sucesso!")),
            failure: Some(Notification::failure("Erro ao fazer login")),
        }
    }
}
