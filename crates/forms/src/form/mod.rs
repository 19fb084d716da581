//! Client-side form state: field updates, validation and submission status.

mod records;
mod state;
mod validate;

use std::fmt::Display;
use std::str::FromStr;

use serde::Serialize;

use crate::model::{FormType, Submission};

pub use state::{DEFAULT_STATUS_DISPLAY, FormState, SubmitError, SubmitStatus};
pub use validate::{FieldViolation, Reason, ValidationErrors};

/// A record one form edits and submits.
pub trait FormRecord: Clone + PartialEq + Serialize + Into<Submission> + Send + Sync {
    /// Which form this record belongs to.
    const FORM_TYPE: FormType;

    /// Whether a snapshot is kept after a successful submit (for the receipt).
    const KEEPS_RECEIPT: bool = false;

    /// The record an untouched form starts with.
    fn defaults() -> Self;

    /// Apply one input event to the field with wire name `name`.
    fn set_field(&mut self, name: &str, input: FieldInput) -> Result<(), FieldError>;

    /// Check the record the way the browser would before allowing submit.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// One input event from a form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    /// Text, select, date, number and radio controls.
    Text(String),
    /// A single checkbox.
    Checked(bool),
    /// One box in a checkbox group.
    Toggle { value: String, checked: bool },
}

impl FieldInput {
    pub fn text(value: impl Into<String>) -> Self {
        FieldInput::Text(value.into())
    }

    pub fn toggle(value: impl Into<String>, checked: bool) -> Self {
        FieldInput::Toggle {
            value: value.into(),
            checked,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            FieldInput::Text(_) => "text",
            FieldInput::Checked(_) => "checkbox",
            FieldInput::Toggle { .. } => "checkbox group",
        }
    }

    pub(crate) fn into_text(self, field: &str) -> Result<String, FieldError> {
        match self {
            FieldInput::Text(value) => Ok(value),
            other => Err(FieldError::wrong_input(field, &other)),
        }
    }

    pub(crate) fn into_optional_text(self, field: &str) -> Result<Option<String>, FieldError> {
        let value = self.into_text(field)?;
        Ok((!value.trim().is_empty()).then_some(value))
    }

    pub(crate) fn into_choice<T>(self, field: &str) -> Result<T, FieldError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let value = self.into_text(field)?;
        value
            .parse()
            .map_err(|e: T::Err| FieldError::invalid(field, e))
    }

    pub(crate) fn into_optional_choice<T>(self, field: &str) -> Result<Option<T>, FieldError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.into_optional_text(field)? {
            Some(value) => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|e: T::Err| FieldError::invalid(field, e)),
            None => Ok(None),
        }
    }

    pub(crate) fn into_checked(self, field: &str) -> Result<bool, FieldError> {
        match self {
            FieldInput::Checked(checked) => Ok(checked),
            other => Err(FieldError::wrong_input(field, &other)),
        }
    }
}

/// Why an input event was refused. The record is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("field `{field}` does not take {input} input")]
    WrongInput { field: String, input: &'static str },

    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl FieldError {
    fn wrong_input(field: &str, input: &FieldInput) -> Self {
        FieldError::WrongInput {
            field: field.to_string(),
            input: input.kind(),
        }
    }

    fn invalid(field: &str, reason: impl Display) -> Self {
        FieldError::InvalidValue {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}
