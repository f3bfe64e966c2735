//! The uniform error record

use super::codes::ErrorCode;
use super::messages;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// A normalized, display-ready error.
///
/// Created exactly once per failure event and never modified afterwards:
/// the fields are private and only readable through accessors. The
/// serialized form uses the camelCase field names external log collectors
/// expect (`statusCode`).
///
/// # Example
///
/// ```rust
/// use error_normalizer::{ErrorCode, NormalizedError};
///
/// let err = NormalizedError::not_found("Tutor");
/// assert_eq!(err.code(), &ErrorCode::NotFound);
/// assert_eq!(err.message(), "Tutor not found");
/// assert_eq!(err.status_code(), Some(404));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{code}: {message}")]
pub struct NormalizedError {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
    timestamp: DateTime<Utc>,
}

impl NormalizedError {
    /// Create a record stamped with the current time.
    ///
    /// This does not touch any history or log; use the
    /// [`ErrorNormalizer`](crate::ErrorNormalizer) operations for that.
    pub fn new(
        code: ErrorCode,
        message: impl Into<String>,
        details: Option<Value>,
        status_code: Option<u16>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            status_code,
            timestamp: Utc::now(),
        }
    }

    /// Network failure with status 0 (no response was received).
    pub fn network(message: Option<&str>) -> Self {
        Self::new(
            ErrorCode::NetworkError,
            message.unwrap_or(messages::NETWORK_ERROR),
            None,
            Some(0),
        )
    }

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ValidationError,
            message,
            Some(json!({ "field": field })),
            Some(400),
        )
    }

    pub fn unauthorized(message: Option<&str>) -> Self {
        Self::new(
            ErrorCode::Unauthorized,
            message.unwrap_or(messages::UNAUTHORIZED),
            None,
            Some(401),
        )
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(
            ErrorCode::NotFound,
            format!("{resource} not found"),
            Some(json!({ "resource": resource })),
            Some(404),
        )
    }

    pub fn code(&self) -> &ErrorCode {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Compare everything except the creation timestamp.
    pub fn same_content(&self, other: &Self) -> bool {
        self.code == other.code
            && self.message == other.message
            && self.details == other.details
            && self.status_code == other.status_code
    }

    /// User-facing text for this error.
    ///
    /// Priority: the fixed text for a known code, then the record's own
    /// message when non-empty, then a generic apology.
    pub fn friendly_message(&self) -> String {
        if let Some(text) = messages::friendly_text(self.code.as_str()) {
            return text.to_string();
        }
        if !self.message.is_empty() {
            return self.message.clone();
        }
        messages::FALLBACK.to_string()
    }
}
