//! Request validation on top of the `validator` crate.
//!
//! Request DTOs declare their rules with `#[derive(Validate)]`. [`validate`]
//! runs them and flattens the crate's nested error structure into a
//! [`FieldErrors`] report: one human-readable reason per failing field,
//! keyed by the field's JSON (camelCase) name.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

/// Mapping from request field name to the reason it was rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reason for `field`. A later reason for the same field
    /// replaces the earlier one.
    pub fn insert(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.0.insert(field.into(), reason.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validation failed: ")?;
        for (i, (field, reason)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}: {reason}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut report = FieldErrors::new();
        for (field, violations) in errors.field_errors() {
            // `required` explains an empty field better than the length
            // rule that also trips on it.
            let chosen = violations
                .iter()
                .find(|v| v.code == "required")
                .or_else(|| violations.first());
            if let Some(violation) = chosen {
                report.insert(json_field_name(&field), describe(violation));
            }
        }
        report
    }
}

/// Run the declared rules of `request`.
pub fn validate<T: Validate>(request: &T) -> Result<(), FieldErrors> {
    request.validate().map_err(|errors| FieldErrors::from(&errors))
}

/// Custom rule for mandatory text fields: rejects empty and whitespace-only
/// values with the `required` code.
pub fn required_text(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn describe(violation: &ValidationError) -> String {
    if let Some(message) = &violation.message {
        return message.to_string();
    }

    match violation.code.as_ref() {
        "required" => "is required".to_string(),
        "length" => describe_length(violation),
        "range" => describe_range(violation),
        code => format!("is invalid ({code})"),
    }
}

fn describe_length(violation: &ValidationError) -> String {
    let min = violation.params.get("min").and_then(Value::as_u64);
    let max = violation.params.get("max").and_then(Value::as_u64);
    let actual = violation
        .params
        .get("value")
        .and_then(Value::as_str)
        .map(|s| s.chars().count() as u64);

    match (min, max, actual) {
        (Some(min), _, Some(len)) if len < min => format!("must be at least {min} characters"),
        (_, Some(max), Some(len)) if len > max => format!("must not exceed {max} characters"),
        (Some(min), _, None) => format!("must be at least {min} characters"),
        (None, Some(max), None) => format!("must not exceed {max} characters"),
        _ => "has an invalid length".to_string(),
    }
}

fn describe_range(violation: &ValidationError) -> String {
    let min = violation.params.get("min");
    let max = violation.params.get("max");
    let actual = violation.params.get("value").and_then(Value::as_f64);

    let below = |bound: &Value| match (bound.as_f64(), actual) {
        (Some(bound), Some(actual)) => actual < bound,
        _ => true,
    };

    match (min, max) {
        (Some(min), _) if below(min) => format!("must be at least {}", format_number(min)),
        (_, Some(max)) => format!("must not exceed {}", format_number(max)),
        (Some(min), None) => format!("must be at least {}", format_number(min)),
        (None, None) => "is out of range".to_string(),
    }
}

/// Render a numeric rule parameter without a trailing `.0`.
fn format_number(value: &Value) -> String {
    if let Some(n) = value.as_i64() {
        return n.to_string();
    }
    match value.as_f64() {
        Some(n) if n.fract() == 0.0 => format!("{}", n as i64),
        Some(n) => n.to_string(),
        None => value.to_string(),
    }
}

/// `role_id` -> `roleId`. Names already in camelCase pass through.
fn json_field_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = !out.is_empty();
            continue;
        }
        if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
