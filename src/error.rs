//! Error taxonomy shared by both front ends.
//!
//! Every externally facing operation converts its failures into one of these
//! variants before they reach the caller. The HTTP front end renders them as
//! `{success: false, error | errors}` bodies (see `server`), the interactive
//! front end prints them inline.

use std::collections::BTreeMap;

use thiserror::Error;

/// Field name -> human readable messages, in the shape returned to HTTP callers.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing credential or unusable client setup. Fatal at startup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Malformed request shape or out-of-range values, with per-field detail.
    #[error("invalid input: {}", summarize(.0))]
    Validation(FieldErrors),

    /// Request rejected as a whole, without a specific field to blame.
    #[error("{0}")]
    BadRequest(String),

    /// The remote generative service could not produce a response.
    #[error("{0}")]
    RemoteCall(String),

    /// Storage, serialization and other internal failures.
    #[error("Server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Single-field validation failure.
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        AppError::Validation(errors)
    }
}

fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(err.to_string())
    }
}
