//! Constraint checking equivalent to the browser's native form validation.

use std::fmt;

/// Why a field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// Required field left blank.
    Missing,
    /// Not shaped like an email address.
    InvalidEmail,
    /// Required checkbox left unticked.
    NotAccepted,
    /// Checkbox group with nothing ticked.
    NothingSelected,
    /// Number below the input's `min`.
    BelowMinimum(u32),
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Missing => f.write_str("is required"),
            Reason::InvalidEmail => f.write_str("must be an email address"),
            Reason::NotAccepted => f.write_str("must be accepted"),
            Reason::NothingSelected => f.write_str("needs at least one selection"),
            Reason::BelowMinimum(min) => write!(f, "must be at least {min}"),
        }
    }
}

/// A single failed constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub reason: Reason,
}

/// Every failed constraint on a record, in form order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", describe(.0))]
pub struct ValidationErrors(pub Vec<FieldViolation>);

impl ValidationErrors {
    /// Whether `field` failed for any reason.
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|v| v.field).collect()
    }
}

fn describe(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("`{}` {}", v.field, v.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Accumulates violations while walking a record's fields.
#[derive(Debug, Default)]
pub(crate) struct Validator {
    violations: Vec<FieldViolation>,
}

impl Validator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, field: &'static str, reason: Reason) {
        self.violations.push(FieldViolation { field, reason });
    }

    pub(crate) fn required(&mut self, field: &'static str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.push(field, Reason::Missing);
        }
        self
    }

    pub(crate) fn required_opt<T>(&mut self, field: &'static str, value: Option<&T>) -> &mut Self {
        if value.is_none() {
            self.push(field, Reason::Missing);
        }
        self
    }

    pub(crate) fn email(&mut self, field: &'static str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.push(field, Reason::Missing);
        } else if !looks_like_email(value) {
            self.push(field, Reason::InvalidEmail);
        }
        self
    }

    pub(crate) fn accepted(&mut self, field: &'static str, checked: bool) -> &mut Self {
        if !checked {
            self.push(field, Reason::NotAccepted);
        }
        self
    }

    pub(crate) fn selected(&mut self, field: &'static str, empty: bool) -> &mut Self {
        if empty {
            self.push(field, Reason::NothingSelected);
        }
        self
    }

    /// Like `min` on a number input: blank passes, a value must reach `min`.
    pub(crate) fn at_least(
        &mut self,
        field: &'static str,
        value: Option<u32>,
        min: u32,
    ) -> &mut Self {
        if value.is_some_and(|n| n < min) {
            self.push(field, Reason::BelowMinimum(min));
        }
        self
    }

    pub(crate) fn finish(&mut self) -> Result<(), ValidationErrors> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(std::mem::take(&mut self.violations)))
        }
    }
}

/// Same acceptance rule as `<input type="email">`: one `@` with a
/// non-empty local part and a non-empty domain, no whitespace.
fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
}
