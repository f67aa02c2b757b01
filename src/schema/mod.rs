//! Declarative form schemas and the validator that evaluates them.
//!
//! A [`FormSchema`] lists its fields in display order. Each field carries an
//! ordered list of [`Rule`]s; the form may add cross-field [`Refinement`]s.
//! [`validate`] is a pure function of the schema and the current
//! [`FormValues`].

mod rules;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::FormError;

pub use rules::{Refinement, Rule};

/// How a field is rendered and prompted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    Email,
    Password,
}

/// Declarative description of a single form field.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub name: &'static str,
    pub label: Option<&'static str>,
    pub placeholder: Option<&'static str>,
    pub kind: InputKind,
    pub read_only: bool,
    pub rules: Vec<Rule>,
}

impl FieldSchema {
    pub fn new(name: &'static str, kind: InputKind, rules: Vec<Rule>) -> Self {
        Self {
            name,
            label: None,
            placeholder: None,
            kind,
            read_only: false,
            rules,
        }
    }

    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn with_read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Label for prompts, falling back to the placeholder and then the name.
    pub fn display_label(&self) -> &'static str {
        self.label.or(self.placeholder).unwrap_or(self.name)
    }

    fn first_failure(&self, value: &str) -> Option<&str> {
        self.rules.iter().find_map(|rule| rule.check(value).err())
    }
}

/// Field list plus cross-field refinements.
#[derive(Debug, Clone)]
pub struct FormSchema {
    pub name: &'static str,
    pub fields: Vec<FieldSchema>,
    pub refinements: Vec<Refinement>,
}

impl FormSchema {
    pub fn new(name: &'static str, fields: Vec<FieldSchema>) -> Self {
        Self {
            name,
            fields,
            refinements: Vec::new(),
        }
    }

    pub fn with_refinement(mut self, refinement: Refinement) -> Self {
        self.refinements.push(refinement);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.name)
    }
}

/// Current string value of every field declared by a schema.
///
/// Values are only constructed through [`FormValues::empty`] or
/// [`FormValues::from_pairs`], so the key set always equals the schema's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    /// Every declared field set to the empty string.
    pub fn empty(schema: &FormSchema) -> Self {
        Self(
            schema
                .field_names()
                .map(|name| (name.to_string(), String::new()))
                .collect(),
        )
    }

    /// Starts from [`FormValues::empty`] and applies `pairs`. Names the
    /// schema does not declare are reported as [`FormError::UnknownField`].
    pub fn from_pairs<'a, I>(schema: &FormSchema, pairs: I) -> Result<Self, FormError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut values = Self::empty(schema);
        for (name, value) in pairs {
            values.set(name, value)?;
        }
        Ok(values)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Replaces the value of an existing field.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        match self.0.get_mut(name) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(FormError::UnknownField(name.to_string())),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Validated field values. Values are passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NormalizedRecord(BTreeMap<String, String>);

impl NormalizedRecord {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// First failing message per field. Passing fields are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert_first(&mut self, name: &str, message: &str) {
        self.0
            .entry(name.to_string())
            .or_insert_with(|| message.to_string());
    }
}

/// Outcome of running [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum ValidationResult {
    Accepted(NormalizedRecord),
    Rejected(FieldErrors),
}

impl ValidationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationResult::Accepted(_))
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            ValidationResult::Accepted(_) => None,
            ValidationResult::Rejected(errors) => Some(errors),
        }
    }
}

/// Evaluates `schema` against `values`.
///
/// Per-field rules run in declaration order and stop at the first failure for
/// that field. Refinements only run when no field failed, and report against
/// their target field.
pub fn validate(schema: &FormSchema, values: &FormValues) -> ValidationResult {
    let lookup = |name: &str| values.get(name).unwrap_or("");

    let mut errors = FieldErrors::default();
    for field in &schema.fields {
        if let Some(message) = field.first_failure(lookup(field.name)) {
            errors.insert_first(field.name, message);
        }
    }

    if errors.is_empty() {
        for refinement in &schema.refinements {
            if let Err(message) = refinement.check(lookup) {
                errors.insert_first(refinement.target(), message);
            }
        }
    }

    if errors.is_empty() {
        let record = schema
            .field_names()
            .map(|name| (name.to_string(), lookup(name).to_string()))
            .collect();
        ValidationResult::Accepted(NormalizedRecord(record))
    } else {
        ValidationResult::Rejected(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup_schema() -> FormSchema {
        FormSchema::new(
            "signup",
            vec![
                FieldSchema::new(
                    "email",
                    InputKind::Email,
                    vec![Rule::required("email required"), Rule::email("bad email")],
                ),
                FieldSchema::new(
                    "password",
                    InputKind::Password,
                    vec![Rule::min_length(4, "too short")],
                ),
                FieldSchema::new(
                    "repeat",
                    InputKind::Password,
                    vec![Rule::required("repeat required")],
                ),
            ],
        )
        .with_refinement(Refinement::fields_equal(
            "password",
            "repeat",
            "passwords differ",
        ))
    }

    fn values(pairs: &[(&str, &str)]) -> FormValues {
        FormValues::from_pairs(&signup_schema(), pairs.iter().copied()).unwrap()
    }

    #[test]
    fn first_failing_rule_wins_per_field() {
        let result = validate(&signup_schema(), &values(&[("password", "abcd")]));
        let errors = result.errors().expect("rejected");
        assert_eq!(errors.get("email"), Some("email required"));
        assert_eq!(errors.get("repeat"), Some("repeat required"));
        assert!(!errors.contains("password"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn refinement_waits_for_field_rules() {
        let result = validate(
            &signup_schema(),
            &values(&[("email", "bad"), ("password", "abcd"), ("repeat", "zzzz")]),
        );
        let errors = result.errors().expect("rejected");
        assert_eq!(errors.get("email"), Some("bad email"));
        assert!(!errors.contains("repeat"));
    }

    #[test]
    fn refinement_does_not_override_field_error() {
        let result = validate(
            &signup_schema(),
            &values(&[("email", "a@b.io"), ("password", "abc"), ("repeat", "abcd")]),
        );
        let errors = result.errors().expect("rejected");
        assert_eq!(errors.get("password"), Some("too short"));
        assert!(!errors.contains("repeat"));
    }

    #[test]
    fn refinement_reports_on_target() {
        let result = validate(
            &signup_schema(),
            &values(&[("email", "a@b.io"), ("password", "abcd"), ("repeat", "abce")]),
        );
        let errors = result.errors().expect("rejected");
        assert_eq!(errors.get("repeat"), Some("passwords differ"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn accepted_record_keeps_values_untouched() {
        let result = validate(
            &signup_schema(),
            &values(&[("email", " a@b.io"), ("password", " abcd"), ("repeat", " abcd")]),
        );
        // Leading whitespace fails the email shape.
        assert!(!result.is_accepted());

        let result = validate(
            &signup_schema(),
            &values(&[("email", "a@b.io"), ("password", " ab "), ("repeat", " ab ")]),
        );
        match result {
            ValidationResult::Accepted(record) => {
                assert_eq!(record.get("password"), Some(" ab "));
                assert_eq!(record.len(), 3);
            }
            other => panic!("expected acceptance, got {other:?}"),
        }
    }

    #[test]
    fn unknown_field_is_rejected_by_values() {
        let err = FormValues::from_pairs(&signup_schema(), [("nickname", "x")]).unwrap_err();
        assert!(matches!(err, FormError::UnknownField(name) if name == "nickname"));
    }

    #[test]
    fn empty_values_cover_every_field() {
        let values = FormValues::empty(&signup_schema());
        assert_eq!(values.len(), 3);
        assert!(values.iter().all(|(_, v)| v.is_empty()));
    }

    #[test]
    fn rejection_serializes_as_field_map() {
        let result = validate(&signup_schema(), &values(&[]));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["data"]["email"], "email required");
    }
}
