//! Unified error type for the book store.
//!
//! Every fallible operation returns [`Result`]. Validation failures carry a
//! per-field breakdown so callers can report each invalid field separately.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Errors raised by the book store service layer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Invalid input: {0}")]
    Validation(ValidationErrors),

    #[error("Authentication credentials were not provided.")]
    NotAuthenticated,

    #[error("You do not have permission to perform this action.")]
    PermissionDenied,

    #[error("Book not found: {id}")]
    BookNotFound { id: i64 },

    #[error("User not found: {username}")]
    UserNotFound { username: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ValidationErrors> for Error {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl Error {
    /// Returns the validation details when this is a validation failure.
    #[must_use]
    pub const fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// A single problem with one input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Machine-readable code, e.g. `invalid_choice` or `required`
    pub code: &'static str,
    /// Human-readable message
    pub message: String,
}

/// Field name to the list of problems found for that field.
///
/// Serializes as `{"rate": [{"code": "invalid_choice", "message": "..."}]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<FieldError>>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a problem for `field`.
    pub fn add(&mut self, field: &str, code: &'static str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(FieldError {
            code,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Problems recorded for `field`, empty if the field is valid.
    #[must_use]
    pub fn field(&self, field: &str) -> &[FieldError] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// Converts into `Err` when at least one problem was recorded.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, errors) in &self.0 {
            for error in errors {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {}", error.message)?;
                first = false;
            }
        }
        Ok(())
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
