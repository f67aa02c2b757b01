use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::forms::{FieldBinding, FormModel};
use crate::notify::{Notification, NotificationTemplates};
use crate::schema::{FieldSchema, FormSchema, InputKind, Refinement, Rule};
use crate::shell::{Presentation, ShellCopy};

pub const CURRENT_PASSWORD: &str = "currentPassword";
pub const NEW_PASSWORD: &str = "newPassword";
pub const CONFIRM_PASSWORD: &str = "confirmPassword";

pub const NEW_PASSWORD_MIN_LEN: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

static BINDINGS: [FieldBinding<ChangePasswordForm>; 3] = [
    FieldBinding {
        name: CURRENT_PASSWORD,
        get: |form| form.current_password.as_str(),
        set: |form, value| form.current_password = value,
    },
    FieldBinding {
        name: NEW_PASSWORD,
        get: |form| form.new_password.as_str(),
        set: |form, value| form.new_password = value,
    },
    FieldBinding {
        name: CONFIRM_PASSWORD,
        get: |form| form.confirm_password.as_str(),
        set: |form, value| form.confirm_password = value,
    },
];

static COPY: ShellCopy = ShellCopy {
    title: "Alterar Senha",
    description: Some("Informe sua senha atual e defina uma nova senha."),
    trigger_label: Some("Editar Senha"),
    submit_label: "Salvar Senha",
    busy_label: Some("Salvando..."),
};

impl FormModel for ChangePasswordForm {
    fn schema() -> &'static FormSchema {
        static SCHEMA: OnceLock<FormSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            FormSchema::new(
                "change_password",
                vec![
                    FieldSchema::new(
                        CURRENT_PASSWORD,
                        InputKind::Password,
                        vec![Rule::required("Senha atual obrigatória")],
                    )
                    .with_label("Senha atual")
                    .with_placeholder("Senha atual"),
                    FieldSchema::new(
                        NEW_PASSWORD,
                        InputKind::Password,
                        vec![Rule::min_length(
                            NEW_PASSWORD_MIN_LEN,
                            "Nova senha deve ter pelo menos 6 caracteres",
                        )],
                    )
                    .with_label("Nova senha")
                    .with_placeholder("Nova senha"),
                    FieldSchema::new(
                        CONFIRM_PASSWORD,
                        InputKind::Password,
                        vec![Rule::required("Confirme a nova senha")],
                    )
                    .with_label("Confirme a nova senha")
                    .with_placeholder("Confirme a nova senha"),
                ],
            )
            .with_refinement(Refinement::fields_equal(
                NEW_PASSWORD,
                CONFIRM_PASSWORD,
                "As senhas não coincidem",
            ))
        })
    }

    fn bindings() -> &'static [FieldBinding<Self>] {
        &BINDINGS
    }

    fn presentation() -> Presentation {
        Presentation::Dialog
    }

    fn copy() -> &'static ShellCopy {
        &COPY
    }

    fn notifications() -> NotificationTemplates {
        NotificationTemplates {
            success: Some(
                Notification::success("Senha alterada com sucesso!")
                    .with_description("Sua senha foi atualizada."),
            ),
            failure: Some(
                Notification::failure("Erro ao alterar senha")
                    .with_description("Tente novamente mais tarde."),
            ),
        }
    }
}
