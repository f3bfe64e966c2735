//! Input shapes accepted by the normalizer
//!
//! [`Failure`] is the "value of unknown shape" handed to
//! [`ErrorNormalizer::normalize`](crate::ErrorNormalizer::normalize). Most
//! callers never build one by hand; the `From` impls cover strings, errors,
//! `anyhow::Error`, already-normalized records and arbitrary JSON.

use super::codes::ErrorCode;
use super::record::NormalizedError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::backtrace::{Backtrace, BacktraceStatus};

/// A failure value awaiting classification.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// Already normalized; passed through unchanged.
    Normalized(NormalizedError),
    /// A language-level error object.
    Exception {
        message: String,
        /// Rendered cause chain or stack trace, when one exists.
        stack: Option<String>,
    },
    /// A bare message string.
    Message(String),
    /// Anything else. `None` stands for an absent or null value.
    Unknown(Option<Value>),
}

impl Failure {
    /// Capture an error and its `source()` chain.
    pub fn exception<E>(err: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(format!("caused by: {cause}"));
            source = cause.source();
        }

        Self::Exception {
            message: err.to_string(),
            stack: (!causes.is_empty()).then(|| causes.join("\n")),
        }
    }

    /// Append a captured backtrace to an exception's stack text.
    ///
    /// Disabled or unsupported backtraces, and non-exception failures, are
    /// left unchanged.
    pub fn with_backtrace(self, backtrace: &Backtrace) -> Self {
        match self {
            Self::Exception { message, stack }
                if backtrace.status() == BacktraceStatus::Captured =>
            {
                let trace = backtrace.to_string();
                let stack = match stack {
                    Some(causes) => format!("{causes}\n{trace}"),
                    None => trace,
                };
                Self::Exception {
                    message,
                    stack: Some(stack),
                }
            }
            other => other,
        }
    }

    /// Wrap any serializable value of unrecognized shape.
    pub fn unknown<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(Value::Null) | Err(_) => Self::Unknown(None),
            Ok(value) => Self::Unknown(Some(value)),
        }
    }

    /// Classify a JSON value by its shape.
    ///
    /// - objects carrying `code`, `message` and `timestamp` are passed
    ///   through as a [`NormalizedError`]; an undecodable timestamp is
    ///   replaced with the current time;
    /// - objects with a string `message` plus a `stack` or `name` field are
    ///   treated as serialized exceptions;
    /// - strings are messages;
    /// - everything else, `null` included, is unknown.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Self::Unknown(None),
            Value::String(message) => Self::Message(message),
            Value::Object(map) => Self::from_object(map),
            other => Self::Unknown(Some(other)),
        }
    }

    fn from_object(map: Map<String, Value>) -> Self {
        if ["code", "message", "timestamp"]
            .iter()
            .all(|key| map.contains_key(*key))
        {
            if let Ok(record) = serde_json::from_value::<NormalizedError>(Value::Object(map.clone()))
            {
                return Self::Normalized(record);
            }
            if let Some(record) = Self::restamped_record(&map) {
                return Self::Normalized(record);
            }
        }

        let looks_like_exception = map.contains_key("stack") || map.contains_key("name");
        if looks_like_exception {
            if let Some(message) = map.get("message").and_then(Value::as_str) {
                return Self::Exception {
                    message: message.to_string(),
                    stack: map.get("stack").and_then(Value::as_str).map(str::to_string),
                };
            }
        }

        Self::Unknown(Some(Value::Object(map)))
    }

    /// A record whose fields are present but whose timestamp does not decode
    /// (epoch millis, free text). Code, message, details and status survive;
    /// the timestamp is replaced with the current time.
    fn restamped_record(map: &Map<String, Value>) -> Option<NormalizedError> {
        let code = map.get("code")?.as_str()?;
        let message = map.get("message")?.as_str()?;
        let details = map.get("details").filter(|details| !details.is_null()).cloned();
        let status_code = map
            .get("statusCode")
            .and_then(Value::as_u64)
            .and_then(|status| u16::try_from(status).ok());

        Some(NormalizedError::new(
            ErrorCode::parse(code),
            message,
            details,
            status_code,
        ))
    }
}

impl From<NormalizedError> for Failure {
    fn from(err: NormalizedError) -> Self {
        Self::Normalized(err)
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<&str> for Failure {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<Value> for Failure {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl From<Option<Value>> for Failure {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Self::Unknown(None), Self::from_value)
    }
}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        let inner: &(dyn std::error::Error + Send + Sync + 'static) = err.as_ref();
        Self::exception(inner).with_backtrace(err.backtrace())
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for Failure {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::exception(err.as_ref())
    }
}

impl From<std::io::Error> for Failure {
    fn from(err: std::io::Error) -> Self {
        Self::exception(&err)
    }
}

/// Error payload returned by the hosted database's REST layer.
///
/// Only `code` drives classification; the other fields are kept as
/// diagnostic details.
///
/// ```rust
/// use error_normalizer::RemoteDataFailure;
///
/// let failure: RemoteDataFailure =
///     serde_json::from_str(r#"{"code":"23505","message":"duplicate key"}"#).unwrap();
/// assert_eq!(failure.code.as_deref(), Some("23505"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteDataFailure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl RemoteDataFailure {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::default()
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
