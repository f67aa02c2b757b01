use once_cell::sync::Lazy;
use regex::Regex;

/// Local part, `@`, one or more dotted domain labels, alphabetic TLD.
static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

/// Per-field constraint. Every variant carries the message shown when it fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Trimmed value must not be empty.
    Required { message: String },
    /// Value must have at least `min` UTF-16 code units.
    MinLength { min: usize, message: String },
    /// Value must look like an email address.
    Email { message: String },
}

impl Rule {
    pub fn required(message: impl Into<String>) -> Self {
        Rule::Required {
            message: message.into(),
        }
    }

    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        Rule::MinLength {
            min,
            message: message.into(),
        }
    }

    pub fn email(message: impl Into<String>) -> Self {
        Rule::Email {
            message: message.into(),
        }
    }

    /// Returns the failure message when `value` violates the rule.
    pub fn check(&self, value: &str) -> Result<(), &str> {
        let passed = match self {
            Rule::Required { .. } => !value.trim().is_empty(),
            Rule::MinLength { min, .. } => value.encode_utf16().count() >= *min,
            Rule::Email { .. } => is_email(value),
        };
        if passed {
            Ok(())
        } else {
            Err(self.message())
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Rule::Required { message }
            | Rule::MinLength { message, .. }
            | Rule::Email { message } => message.as_str(),
        }
    }
}

/// Cross-field constraint evaluated once every per-field rule has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refinement {
    /// `target` must hold exactly the same string as `source`. Failures are
    /// reported on `target`.
    FieldsEqual {
        source: &'static str,
        target: &'static str,
        message: String,
    },
}

impl Refinement {
    pub fn fields_equal(
        source: &'static str,
        target: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Refinement::FieldsEqual {
            source,
            target,
            message: message.into(),
        }
    }

    /// Field that receives the error when the refinement fails.
    pub fn target(&self) -> &'static str {
        match self {
            Refinement::FieldsEqual { target, .. } => *target,
        }
    }

    pub fn check<'a>(&self, lookup: impl Fn(&str) -> &'a str) -> Result<(), &str> {
        match self {
            Refinement::FieldsEqual {
                source,
                target,
                message,
            } => {
                if lookup(source) == lookup(target) {
                    Ok(())
                } else {
                    Err(message.as_str())
                }
            }
        }
    }
}

fn is_email(value: &str) -> bool {
    let Some((local, _)) = value.split_once('@') else {
        return false;
    };
    if local.starts_with('.') || local.contains("..") {
        return false;
    }
    EMAIL_SHAPE.is_match(value)
}
