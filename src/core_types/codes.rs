//! Error code taxonomy
//!
//! Every [`NormalizedError`](super::NormalizedError) carries one of these codes.
//! The set is fixed; codes that arrive on foreign records passed through
//! unchanged are preserved verbatim in [`ErrorCode::Other`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// High-level categorization of errors for routing and handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Expected business logic outcomes (not found, duplicates).
    BusinessLogic,
    /// External service failures (remote database, network, upstream HTTP).
    External,
    /// Internal system errors (bugs, uncaught exceptions).
    Internal,
    /// Client errors (invalid input, authentication).
    Client,
    /// Temporary failures that should be retried.
    Transient,
}

/// Severity level for logging and alerting decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// System is unusable
    Critical,
    /// Action failed but system is stable
    Error,
    /// Unexpected but recoverable
    Warning,
    /// Expected failure (e.g., not found)
    Info,
}

/// Machine-readable error category tag.
///
/// Serializes to its SCREAMING_SNAKE_CASE wire name:
///
/// ```rust
/// use error_normalizer::ErrorCode;
///
/// assert_eq!(ErrorCode::NotFound.as_str(), "NOT_FOUND");
/// assert_eq!(ErrorCode::parse("DUPLICATE_ERROR"), ErrorCode::DuplicateError);
/// assert_eq!(ErrorCode::parse("SESSION_EXPIRED").as_str(), "SESSION_EXPIRED");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorCode {
    GenericError,
    StringError,
    UnknownError,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    ValidationError,
    RateLimitExceeded,
    ServerError,
    ServiceUnavailable,
    HttpError,
    DuplicateError,
    ForeignKeyError,
    PermissionDenied,
    DatabaseError,
    NetworkError,
    /// A code outside the taxonomy, carried by a passed-through record.
    Other(String),
}

impl ErrorCode {
    /// All codes of the fixed taxonomy, in declaration order.
    pub const TAXONOMY: [ErrorCode; 17] = [
        ErrorCode::GenericError,
        ErrorCode::StringError,
        ErrorCode::UnknownError,
        ErrorCode::BadRequest,
        ErrorCode::Unauthorized,
        ErrorCode::Forbidden,
        ErrorCode::NotFound,
        ErrorCode::ValidationError,
        ErrorCode::RateLimitExceeded,
        ErrorCode::ServerError,
        ErrorCode::ServiceUnavailable,
        ErrorCode::HttpError,
        ErrorCode::DuplicateError,
        ErrorCode::ForeignKeyError,
        ErrorCode::PermissionDenied,
        ErrorCode::DatabaseError,
        ErrorCode::NetworkError,
    ];

    /// Wire name of the code.
    pub fn as_str(&self) -> &str {
        match self {
            Self::GenericError => "GENERIC_ERROR",
            Self::StringError => "STRING_ERROR",
            Self::UnknownError => "UNKNOWN_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::ServerError => "SERVER_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::HttpError => "HTTP_ERROR",
            Self::DuplicateError => "DUPLICATE_ERROR",
            Self::ForeignKeyError => "FOREIGN_KEY_ERROR",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::NetworkError => "NETWORK_ERROR",
            Self::Other(code) => code,
        }
    }

    /// Parse a wire name. Unrecognized names become [`ErrorCode::Other`].
    pub fn parse(code: &str) -> Self {
        Self::TAXONOMY
            .iter()
            .find(|known| known.as_str() == code)
            .cloned()
            .unwrap_or_else(|| Self::Other(code.to_string()))
    }

    /// Whether the code belongs to the fixed taxonomy.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::GenericError | Self::UnknownError | Self::ServerError => ErrorCategory::Internal,
            Self::StringError
            | Self::BadRequest
            | Self::Unauthorized
            | Self::Forbidden
            | Self::ValidationError
            | Self::PermissionDenied => ErrorCategory::Client,
            Self::NotFound | Self::DuplicateError | Self::ForeignKeyError => {
                ErrorCategory::BusinessLogic
            }
            Self::RateLimitExceeded | Self::ServiceUnavailable | Self::NetworkError => {
                ErrorCategory::Transient
            }
            Self::HttpError | Self::DatabaseError | Self::Other(_) => ErrorCategory::External,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::GenericError | Self::UnknownError | Self::ServerError | Self::DatabaseError => {
                ErrorSeverity::Error
            }
            Self::RateLimitExceeded
            | Self::ServiceUnavailable
            | Self::NetworkError
            | Self::HttpError
            | Self::Unauthorized
            | Self::Forbidden
            | Self::PermissionDenied
            | Self::Other(_) => ErrorSeverity::Warning,
            Self::StringError
            | Self::BadRequest
            | Self::NotFound
            | Self::ValidationError
            | Self::DuplicateError
            | Self::ForeignKeyError => ErrorSeverity::Info,
        }
    }

    /// Whether the failed operation is worth retrying unchanged.
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Transient
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ErrorCode {
    fn from(code: String) -> Self {
        Self::parse(&code)
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        Self::parse(code)
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::Other(code) => code,
            known => known.as_str().to_string(),
        }
    }
}
