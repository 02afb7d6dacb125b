//! Field validation for incoming requests.
//!
//! Every request type implements [`Validate`] with an explicit function that
//! walks its fields through [`Rules`]. Failures are collected as
//! `(field, message)` pairs so the client sees every problem at once.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;
use validator::ValidateEmail;

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Ordered collection of field failures.
///
/// Serializes as `{"field": ["message", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a collection holding one failure.
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Whether any failure was recorded against `field`.
    pub fn has(&self, field: &str) -> bool {
        self.iter().any(|e| e.field == field)
    }

    /// Group messages by field name.
    pub fn by_field(&self) -> BTreeMap<&'static str, Vec<String>> {
        let mut grouped: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
        for error in &self.0 {
            grouped
                .entry(error.field)
                .or_default()
                .push(error.message.clone());
        }
        grouped
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join(", "))
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.by_field().serialize(serializer)
    }
}

/// Per-operation validation.
///
/// Consumes the raw request and yields its checked form, so code past the
/// validation step never handles a missing field.
pub trait Validate {
    type Valid;

    fn validate(self) -> Result<Self::Valid, FieldErrors>;
}

/// Collects rule failures for one request.
///
/// Request fields arrive as raw JSON values. Each presence helper checks the
/// value and converts it, returning `None` after recording a failure, so
/// format rules are only applied to values that exist.
#[derive(Debug, Default)]
pub struct Rules {
    errors: FieldErrors,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field must be present and a string. Surrounding whitespace is dropped.
    pub fn required_string(&mut self, field: &'static str, value: Option<Value>) -> Option<String> {
        match self.present(field, value)? {
            Value::String(text) => Some(text.trim().to_string()),
            _ => self.reject(field, format!("The {} must be a string.", field)),
        }
    }

    /// Like [`Rules::required_string`], but the value is kept exactly as sent.
    pub fn required_secret(&mut self, field: &'static str, value: Option<Value>) -> Option<String> {
        match self.present(field, value)? {
            Value::String(text) => Some(text),
            _ => self.reject(field, format!("The {} must be a string.", field)),
        }
    }

    /// Field must be present; numbers are accepted and kept as their text.
    pub fn required_text(&mut self, field: &'static str, value: Option<Value>) -> Option<String> {
        match self.present(field, value)? {
            Value::String(text) => Some(text.trim().to_string()),
            Value::Number(number) => Some(number.to_string()),
            _ => self.reject(field, format!("The {} must be a string.", field)),
        }
    }

    /// Field must be present and numeric. Numeric strings such as `"9.99"` count.
    pub fn numeric(&mut self, field: &'static str, value: Option<Value>) -> Option<f64> {
        let number = match self.present(field, value)? {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        match number.filter(|n| n.is_finite()) {
            Some(number) => Some(number),
            None => self.reject(field, format!("The {} must be a number.", field)),
        }
    }

    /// Field must be present and a whole number that fits in `i32`.
    pub fn integer(&mut self, field: &'static str, value: Option<Value>) -> Option<i32> {
        let number = match self.present(field, value)? {
            Value::Number(number) => number.as_i64().and_then(|n| i32::try_from(n).ok()),
            Value::String(text) => text.trim().parse::<i32>().ok(),
            _ => None,
        };
        match number {
            Some(number) => Some(number),
            None => self.reject(field, format!("The {} must be an integer.", field)),
        }
    }

    /// `None` (and a "required" failure) for absent, null or blank values.
    fn present(&mut self, field: &'static str, value: Option<Value>) -> Option<Value> {
        let blank = match &value {
            None | Some(Value::Null) => true,
            Some(Value::String(text)) => text.trim().is_empty(),
            Some(Value::Array(items)) => items.is_empty(),
            Some(_) => false,
        };
        if blank {
            self.reject(field, format!("The {} field is required.", field))
        } else {
            value
        }
    }

    fn reject<T>(&mut self, field: &'static str, message: String) -> Option<T> {
        self.errors.add(field, message);
        None
    }

    pub fn email(&mut self, field: &'static str, value: &str) {
        if !value.validate_email() {
            self.errors
                .add(field, format!("The {} must be a valid email address.", field));
        }
    }

    /// Length in characters must fall within `min..=max`.
    pub fn length_between(&mut self, field: &'static str, value: &str, min: usize, max: usize) {
        let length = value.chars().count();
        if length < min {
            self.errors.add(
                field,
                format!("The {} must be at least {} characters.", field, min),
            );
        } else if length > max {
            self.errors.add(
                field,
                format!("The {} may not be greater than {} characters.", field, max),
            );
        }
    }

    pub fn finish(self) -> Result<(), FieldErrors> {
        self.errors.into_result()
    }

    /// Failures recorded so far.
    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }
}
