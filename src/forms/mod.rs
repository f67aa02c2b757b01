//! Concrete account forms and the typed field registry that binds them to
//! their schemas.
//!
//! Each form record lists a static table of [`FieldBinding`]s: the field name
//! plus a getter/setter pair. Converting between the typed record and
//! [`FormValues`] walks that table, so no runtime reflection is involved.

pub mod change_password;
pub mod login;
pub mod settings;

use std::fmt;

use crate::errors::FormError;
use crate::notify::NotificationTemplates;
use crate::schema::{FormSchema, FormValues, NormalizedRecord};
use crate::shell::{Presentation, ShellCopy};

pub use change_password::ChangePasswordForm;
pub use login::LoginForm;
pub use settings::SettingsForm;

/// Typed accessor pair for one field of a form record.
pub struct FieldBinding<M> {
    pub name: &'static str,
    pub get: fn(&M) -> &str,
    pub set: fn(&mut M, String),
}

/// A form record together with everything needed to validate, submit and
/// present it.
pub trait FormModel: Clone + Default + fmt::Debug + Send + Sync + 'static {
    fn schema() -> &'static FormSchema;

    /// One binding per schema field, in schema order.
    fn bindings() -> &'static [FieldBinding<Self>];

    fn presentation() -> Presentation {
        Presentation::Page
    }

    fn copy() -> &'static ShellCopy;

    fn notifications() -> NotificationTemplates {
        NotificationTemplates::default()
    }

    fn to_values(&self) -> Result<FormValues, FormError> {
        FormValues::from_pairs(
            Self::schema(),
            Self::bindings()
                .iter()
                .map(|binding| (binding.name, (binding.get)(self))),
        )
    }

    fn from_values(values: &FormValues) -> Self {
        Self::assemble(|name| values.get(name))
    }

    fn from_record(record: &NormalizedRecord) -> Self {
        Self::assemble(|name| record.get(name))
    }

    #[doc(hidden)]
    fn assemble<'a>(lookup: impl Fn(&str) -> Option<&'a str>) -> Self {
        let mut model = Self::default();
        for binding in Self::bindings() {
            if let Some(value) = lookup(binding.name) {
                (binding.set)(&mut model, value.to_string());
            }
        }
        model
    }
}

/// Registry names that do not line up with the schema's fields, used by the
/// tests of every form.
#[cfg(test)]
pub(crate) fn registry_mismatches<M: FormModel>() -> Vec<String> {
    let schema_names: Vec<_> = M::schema().field_names().collect();
    let binding_names: Vec<_> = M::bindings().iter().map(|b| b.name).collect();
    if schema_names == binding_names {
        Vec::new()
    } else {
        vec![format!("schema {schema_names:?} != bindings {binding_names:?}")]
    }
}
