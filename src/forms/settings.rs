use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::forms::{FieldBinding, FormModel};
use crate::schema::{FieldSchema, FormSchema, InputKind, Rule};
use crate::shell::ShellCopy;

pub const NAME: &str = "name";
pub const EMAIL: &str = "email";

/// Address shown until the account profile is wired to a real backend.
pub const PLACEHOLDER_EMAIL: &str = "usuario@email.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsForm {
    pub name: String,
    pub email: String,
}

impl Default for SettingsForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: PLACEHOLDER_EMAIL.into(),
        }
    }
}

static BINDINGS: [FieldBinding<SettingsForm>; 2] = [
    FieldBinding {
        name: NAME,
        get: |form| form.name.as_str(),
        set: |form, value| form.name = value,
    },
    FieldBinding {
        name: EMAIL,
        get: |form| form.email.as_str(),
        set: |form, value| form.email = value,
    },
];

static COPY: ShellCopy = ShellCopy {
    title: "Configurações da Conta",
    description: None,
    trigger_label: None,
    submit_label: "Salvar",
    busy_label: None,
};

impl FormModel for SettingsForm {
    fn schema() -> &'static FormSchema {
        static SCHEMA: OnceLock<FormSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            FormSchema::new(
                "settings",
                vec![
                    FieldSchema::new(
                        NAME,
                        InputKind::Text,
                        vec![
                            Rule::required("Nome obrigatório"),
                            Rule::min_length(2, "Nome obrigatório"),
                        ],
                    )
                    .with_label("Nome")
                    .with_placeholder("Seu nome"),
                    FieldSchema::new(EMAIL, InputKind::Email, vec![Rule::email("Invalid email")])
                        .with_label("Email")
                        .with_read_only(),
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
}
