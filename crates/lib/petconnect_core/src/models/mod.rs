//! Domain models.
//!
//! These are internal domain types, distinct from the API request/response
//! shapes in `petconnect_api::models` (which are camelCase on the wire).

pub mod auth;
pub mod contact;
pub mod pet;

use thiserror::Error;

/// Input rejected before it reaches a store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Trim a required text field, rejecting blanks.
pub(crate) fn required(value: &str, message: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(message));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field, collapsing blanks to `None`.
pub(crate) fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
