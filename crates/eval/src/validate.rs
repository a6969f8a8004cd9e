//! Field and form validation.
//!
//! Validation failures are data, not errors: each failing field gets an
//! ordered list of human-readable messages to show next to the input.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use formwright_core::field::{FieldDefinition, FieldType, ValidationRules};
use formwright_core::value::{FieldValue, FormValues};

/// Field id to error messages. Valid fields have no entry.
pub type ValidationResult = BTreeMap<String, Vec<String>>;

/// Aggregate outcome of validating a whole form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValidation {
    pub errors: ValidationResult,
    pub has_errors: bool,
}

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

const PASSWORD_MIN_CHARS: usize = 8;

pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const PASSWORD_MESSAGE: &str =
    "Password must be at least 8 characters with uppercase, lowercase, and number";

pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

/// At least eight characters on a single line, with an ASCII lowercase
/// letter, an ASCII uppercase letter and a digit.
pub fn is_valid_password(s: &str) -> bool {
    s.chars().count() >= PASSWORD_MIN_CHARS
        && !s.contains(['\n', '\r'])
        && s.chars().any(|c| c.is_ascii_lowercase())
        && s.chars().any(|c| c.is_ascii_uppercase())
        && s.chars().any(|c| c.is_ascii_digit())
}

/// Validate one field's value, returning every applicable message.
///
/// Derived fields are never validated. An empty value on an optional field
/// passes without running any other rule.
pub fn validate_field(field: &FieldDefinition, value: Option<&FieldValue>) -> Vec<String> {
    let mut errors = Vec::new();
    if field.is_derived() {
        return errors;
    }

    let value = value.filter(|v| v.is_present());
    if field.required && value.is_none() {
        errors.push(format!("{} is required", field.label));
    }
    let Some(value) = value else {
        return errors;
    };

    let rules = &field.validation;
    match field.field_type {
        FieldType::Number => check_bounds(rules, value, &mut errors),
        FieldType::Text => {
            if let FieldValue::Text(text) = value {
                if rules.email && !is_valid_email(text) {
                    errors.push(EMAIL_MESSAGE.to_string());
                }
                if rules.password && !is_valid_password(text) {
                    errors.push(PASSWORD_MESSAGE.to_string());
                }
            }
            check_length(rules, value, &mut errors);
        }
        FieldType::Textarea
        | FieldType::Select
        | FieldType::Radio
        | FieldType::Checkbox
        | FieldType::Date => check_length(rules, value, &mut errors),
    }
    errors
}

/// Validate every non-derived field of a form.
pub fn validate_form(fields: &[FieldDefinition], values: &FormValues) -> FormValidation {
    let mut errors = ValidationResult::new();
    for field in fields.iter().filter(|f| !f.is_derived()) {
        let messages = validate_field(field, values.get(&field.id));
        if !messages.is_empty() {
            errors.insert(field.id.clone(), messages);
        }
    }
    FormValidation {
        has_errors: !errors.is_empty(),
        errors,
    }
}

/// `minLength`/`maxLength`, counted in characters. Booleans have no length.
fn check_length(rules: &ValidationRules, value: &FieldValue, errors: &mut Vec<String>) {
    if matches!(value, FieldValue::Bool(_)) {
        return;
    }
    let len = value.as_text().chars().count();
    if let Some(min) = rules.min_length {
        if len < min as usize {
            errors.push(format!("Minimum length is {} characters", min));
        }
    }
    if let Some(max) = rules.max_length {
        if len > max as usize {
            errors.push(format!("Maximum length is {} characters", max));
        }
    }
}

/// `min`/`max` on number fields. Input that is not a number is left alone.
fn check_bounds(rules: &ValidationRules, value: &FieldValue, errors: &mut Vec<String>) {
    let Some(n) = value.as_decimal() else {
        return;
    };
    if let Some(min) = rules.min {
        if n < min {
            errors.push(format!("Minimum value is {}", min.normalize()));
        }
    }
    if let Some(max) = rules.max {
        if n > max {
            errors.push(format!("Maximum value is {}", max.normalize()));
        }
    }
}
