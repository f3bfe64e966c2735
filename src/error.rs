//! Error types for the normalizer's own fallible operations.
//!
//! Normalization itself never fails. The errors in this module cover the
//! surrounding machinery: loading and validating configuration, and talking
//! to the external logging sink.
//!
//! # Error Types
//!
//! The main error type is [`NormalizerError`]:
//! - Configuration errors (invalid capacity, malformed sink URL)
//! - Sink transport failures (connection refused, DNS, TLS)
//! - Sink rejections (non-2xx responses)
//! - Sink timeouts
//! - Record serialization failures
//!
//! Sink errors never reach callers of the `normalize*` operations. They are
//! logged inside the forwarding task and dropped there. They are surfaced
//! directly only when a [`LogSink`](crate::sink::LogSink) is driven by hand.
//!
//! # Result Type
//!
//! Use [`NormalizerResult<T>`] as a convenient alias for `Result<T, NormalizerError>`:
//!
//! ```rust
//! use error_normalizer::NormalizerResult;
//!
//! fn my_function() -> NormalizerResult<String> {
//!     Ok("Success".to_string())
//! }
//! ```

use crate::core_types::{ErrorCategory, ErrorSeverity};
use crate::logging::{log_error, log_warn};
use thiserror::Error;

/// Convenient result type for normalizer operations.
pub type NormalizerResult<T> = std::result::Result<T, NormalizerError>;

/// Errors raised by configuration and sink plumbing.
///
/// # Creating Errors
///
/// Use the constructor methods which automatically log the error:
///
/// ```rust
/// use error_normalizer::NormalizerError;
///
/// let err = NormalizerError::configuration_error("history capacity must be non-zero");
/// let err = NormalizerError::sink_timeout(5_000);
/// ```
///
/// | Variant | Category | Retryable |
/// |---------|----------|-----------|
/// | `ConfigurationError` | Client | No |
/// | `SinkRequestFailed` | External | Yes |
/// | `SinkRejected` | External | 5xx only |
/// | `SinkTimeout` | Transient | Yes |
/// | `SerializationFailed` | Internal | No |
#[derive(Error, Debug)]
pub enum NormalizerError {
    /// Normalizer configuration is invalid or incomplete.
    #[error("Normalizer configuration error: {message}")]
    ConfigurationError {
        /// Description of the configuration problem.
        message: String,
    },

    /// The HTTP request to the logging sink could not be completed.
    #[error("Sink request failed: {message}")]
    SinkRequestFailed {
        /// Description of the failure.
        message: String,
        /// The underlying error, if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The logging sink answered with a non-success status.
    #[error("Sink rejected record with status {status}")]
    SinkRejected {
        /// HTTP status returned by the sink.
        status: u16,
    },

    /// The logging sink did not answer within the configured timeout.
    #[error("Sink request timed out after {timeout_ms}ms")]
    SinkTimeout {
        /// The timeout that was exceeded, in milliseconds.
        timeout_ms: u64,
    },

    /// A record could not be serialized for forwarding.
    #[error("Record serialization failed: {message}")]
    SerializationFailed {
        /// Details about the serialization failure.
        message: String,
    },
}

impl NormalizerError {
    /// Get the error category for routing and handling decisions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigurationError { .. } => ErrorCategory::Client,
            Self::SinkRequestFailed { .. } => ErrorCategory::External,
            Self::SinkRejected { .. } => ErrorCategory::External,
            Self::SinkTimeout { .. } => ErrorCategory::Transient,
            Self::SerializationFailed { .. } => ErrorCategory::Internal,
        }
    }

    /// Get the error severity for logging and alerting.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ConfigurationError { .. } => ErrorSeverity::Error,
            Self::SinkRequestFailed { .. } => ErrorSeverity::Warning,
            Self::SinkRejected { .. } => ErrorSeverity::Warning,
            Self::SinkTimeout { .. } => ErrorSeverity::Warning,
            Self::SerializationFailed { .. } => ErrorSeverity::Error,
        }
    }

    /// Whether a later attempt at the same operation could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::SinkRequestFailed { .. } | Self::SinkTimeout { .. } => true,
            Self::SinkRejected { status } => *status >= 500,
            _ => false,
        }
    }

    // =========================================================================
    // Constructor methods with automatic logging
    // =========================================================================

    pub fn configuration_error(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "configuration_error",
            message = %message,
            "Normalizer configuration validation failed"
        );
        Self::ConfigurationError { message }
    }

    pub fn sink_request_failed(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let message = message.into();
        log_warn!(
            error_type = "sink_request_failed",
            message = %message,
            has_source = source.is_some(),
            "Log sink request failed"
        );
        Self::SinkRequestFailed { message, source }
    }

    pub fn sink_rejected(status: u16) -> Self {
        log_warn!(
            error_type = "sink_rejected",
            status = status,
            "Log sink rejected record"
        );
        Self::SinkRejected { status }
    }

    pub fn sink_timeout(timeout_ms: u64) -> Self {
        log_warn!(
            error_type = "sink_timeout",
            timeout_ms = timeout_ms,
            "Log sink request timed out"
        );
        Self::SinkTimeout { timeout_ms }
    }

    pub fn serialization_failed(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "serialization_failed",
            message = %message,
            "Failed to serialize error record"
        );
        Self::SerializationFailed { message }
    }
}
