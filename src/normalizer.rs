//! Error normalizer
//!
//! [`ErrorNormalizer`] turns failure values of any shape into
//! [`NormalizedError`] records. Every `normalize*` operation:
//!
//! 1. classifies its input (this never fails and never panics),
//! 2. appends the result to the bounded history,
//! 3. logs it: a detached best-effort forward to the logging sink in
//!    production, or full structured detail otherwise (development, or
//!    production without a sink).
//!
//! The normalizer is an explicit context object. Build one per process and
//! share it behind an `Arc`; there is no global instance.
//!
//! ```rust
//! use error_normalizer::{ErrorCode, ErrorNormalizer};
//!
//! let normalizer = ErrorNormalizer::default();
//!
//! let err = normalizer.normalize("boom", None);
//! assert_eq!(err.code(), &ErrorCode::StringError);
//! assert_eq!(err.status_code(), Some(400));
//!
//! let err = normalizer.normalize_http_failure(404, None);
//! assert_eq!(err.code(), &ErrorCode::NotFound);
//! assert_eq!(normalizer.history().len(), 2);
//! ```

use crate::config::{NormalizerConfig, DEFAULT_SINK_TIMEOUT};
use crate::core_types::{
    messages, ErrorCode, ErrorSeverity, Failure, NormalizedError, RemoteDataFailure,
};
use crate::error::NormalizerResult;
use crate::history::ErrorHistory;
use crate::logging::{log_debug, log_error, log_info, log_trace, log_warn};
use crate::sink::{duration_millis, HttpLogSink, LogSink, SinkRecord};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug)]
pub struct ErrorNormalizer {
    config: NormalizerConfig,
    history: Mutex<ErrorHistory>,
    sink: Option<Arc<dyn LogSink>>,
}

impl Default for ErrorNormalizer {
    /// Development-mode normalizer with the default history capacity and no sink
    fn default() -> Self {
        let config = NormalizerConfig::default();
        Self {
            history: Mutex::new(ErrorHistory::new(config.history_capacity)),
            config,
            sink: None,
        }
    }
}

impl ErrorNormalizer {
    /// Create a normalizer, building an HTTP sink when one is configured
    ///
    /// # Errors
    ///
    /// Returns [`NormalizerError::ConfigurationError`](crate::NormalizerError::ConfigurationError)
    /// if the configuration fails validation or the HTTP client cannot be built.
    pub fn new(config: NormalizerConfig) -> NormalizerResult<Self> {
        config.validate()?;

        let sink = match &config.sink {
            Some(sink_config) => {
                Some(Arc::new(HttpLogSink::new(sink_config)?) as Arc<dyn LogSink>)
            }
            None => None,
        };

        if sink.is_none() && !config.is_development() {
            log_warn!(
                environment = %config.environment,
                "No log sink configured; errors will be logged locally"
            );
        }

        log_debug!(
            environment = %config.environment,
            history_capacity = config.history_capacity,
            has_sink = sink.is_some(),
            "Error normalizer initialized"
        );

        Ok(Self {
            history: Mutex::new(ErrorHistory::new(config.history_capacity)),
            config,
            sink,
        })
    }

    /// Create a normalizer with configuration loaded from the environment
    pub fn from_env() -> NormalizerResult<Self> {
        Self::new(NormalizerConfig::from_env()?)
    }

    /// Create a normalizer forwarding to a caller-supplied sink
    ///
    /// The sink replaces any HTTP sink the configuration describes; the
    /// configured timeout still bounds each forward.
    pub fn with_sink(config: NormalizerConfig, sink: Arc<dyn LogSink>) -> NormalizerResult<Self> {
        config.validate()?;

        log_debug!(
            environment = %config.environment,
            history_capacity = config.history_capacity,
            sink = ?sink,
            "Error normalizer initialized with custom sink"
        );

        Ok(Self {
            history: Mutex::new(ErrorHistory::new(config.history_capacity)),
            config,
            sink: Some(sink),
        })
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    // =========================================================================
    // Normalization operations
    // =========================================================================

    /// Normalize a failure of arbitrary shape
    ///
    /// | Input | Code | Status |
    /// |-------|------|--------|
    /// | `NormalizedError` | unchanged | unchanged |
    /// | error / exception | `GENERIC_ERROR` | 500 |
    /// | string | `STRING_ERROR` | 400 |
    /// | anything else | `UNKNOWN_ERROR` | 500 |
    pub fn normalize(&self, failure: impl Into<Failure>, context: Option<&str>) -> NormalizedError {
        let error = Self::classify(failure.into(), context);
        self.record(error, context)
    }

    /// Normalize an HTTP error response from its status and optional JSON body
    ///
    /// For 400 and 422 a non-empty `message` string in the body replaces the
    /// default text. Unmapped statuses become `HTTP_ERROR`.
    pub fn normalize_http_failure(&self, status: u16, body: Option<&Value>) -> NormalizedError {
        let error = Self::classify_http_status(status, body);
        self.record(error, None)
    }

    /// Normalize an error returned by the hosted database
    pub fn normalize_remote_data_failure(&self, failure: &RemoteDataFailure) -> NormalizedError {
        let error = Self::classify_remote_data(failure);
        self.record(error, None)
    }

    /// Normalize per-field form validation errors
    ///
    /// The message is the first message of the first field in map order.
    pub fn normalize_validation_failure(
        &self,
        field_errors: &BTreeMap<String, Vec<String>>,
    ) -> NormalizedError {
        let message = field_errors
            .values()
            .next()
            .and_then(|messages| messages.first())
            .map(String::as_str)
            .unwrap_or(messages::VALIDATION_FAILED);

        let error = NormalizedError::new(
            ErrorCode::ValidationError,
            message,
            serde_json::to_value(field_errors).ok(),
            Some(400),
        );
        self.record(error, None)
    }

    /// Normalize a request that never produced a response
    pub fn normalize_transport_failure(
        &self,
        err: &reqwest::Error,
        context: Option<&str>,
    ) -> NormalizedError {
        let error = NormalizedError::new(
            ErrorCode::NetworkError,
            messages::NETWORK_ERROR,
            Some(json!({
                "error": err.to_string(),
                "timeout": err.is_timeout(),
                "connect": err.is_connect(),
                "context": context,
            })),
            Some(0),
        );
        self.record(error, context)
    }

    /// Normalize a non-success HTTP response
    ///
    /// Reads the body as JSON when possible; an unreadable body is treated
    /// as absent.
    pub async fn normalize_response(&self, response: reqwest::Response) -> NormalizedError {
        let status = response.status().as_u16();
        let body = response.json::<Value>().await.ok();
        self.normalize_http_failure(status, body.as_ref())
    }

    /// Await a fallible operation, normalizing its error
    ///
    /// ```rust
    /// use error_normalizer::{ErrorCode, ErrorNormalizer};
    ///
    /// # async fn example() {
    /// let normalizer = ErrorNormalizer::default();
    /// let result: Result<u32, _> = normalizer
    ///     .guard("load_profile", async { Err::<u32, _>("profile missing") })
    ///     .await;
    /// assert_eq!(result.unwrap_err().code(), &ErrorCode::StringError);
    /// # }
    /// ```
    pub async fn guard<T, E, F>(&self, context: &str, operation: F) -> Result<T, NormalizedError>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<Failure>,
    {
        operation
            .await
            .map_err(|err| self.normalize(err, Some(context)))
    }

    /// User-facing text for an error; see [`NormalizedError::friendly_message`]
    pub fn friendly_message(&self, error: &NormalizedError) -> String {
        error.friendly_message()
    }

    /// Send an error to the sink as an explicit report, in any environment
    ///
    /// Fire-and-forget, like production forwarding. Does nothing when no
    /// sink is configured.
    pub fn report(&self, error: &NormalizedError, user_feedback: Option<&str>) {
        if self.sink.is_none() {
            log_debug!(
                error_code = %error.code(),
                "No log sink configured; error report skipped"
            );
            return;
        }

        let record =
            SinkRecord::new(error.clone(), None, &self.config.origin).reported(user_feedback);
        self.forward(record);
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Snapshot of retained errors, oldest first
    pub fn history(&self) -> Vec<NormalizedError> {
        self.lock_history().snapshot()
    }

    pub fn clear_history(&self) {
        self.lock_history().clear();
    }

    // =========================================================================
    // Classification
    // =========================================================================

    fn classify(failure: Failure, context: Option<&str>) -> NormalizedError {
        match failure {
            Failure::Normalized(error) => error,
            Failure::Exception { message, stack } => NormalizedError::new(
                ErrorCode::GenericError,
                message,
                Some(json!({ "stack": stack, "context": context })),
                Some(500),
            ),
            Failure::Message(message) => NormalizedError::new(
                ErrorCode::StringError,
                message,
                Some(json!({ "context": context })),
                Some(400),
            ),
            Failure::Unknown(value) => NormalizedError::new(
                ErrorCode::UnknownError,
                messages::UNKNOWN_ERROR,
                Some(json!({ "error": value, "context": context })),
                Some(500),
            ),
        }
    }

    fn classify_http_status(status: u16, body: Option<&Value>) -> NormalizedError {
        let body_message = body
            .and_then(|body| body.get("message"))
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty());

        let (code, message) = match status {
            400 => (
                ErrorCode::BadRequest,
                body_message.unwrap_or(messages::INVALID_REQUEST).to_string(),
            ),
            401 => (ErrorCode::Unauthorized, messages::UNAUTHORIZED.to_string()),
            403 => (ErrorCode::Forbidden, messages::FORBIDDEN.to_string()),
            404 => (ErrorCode::NotFound, messages::NOT_FOUND.to_string()),
            422 => (
                ErrorCode::ValidationError,
                body_message.unwrap_or(messages::VALIDATION_ERROR).to_string(),
            ),
            429 => (
                ErrorCode::RateLimitExceeded,
                messages::RATE_LIMIT_EXCEEDED.to_string(),
            ),
            500 => (ErrorCode::ServerError, messages::SERVER_ERROR.to_string()),
            503 => (
                ErrorCode::ServiceUnavailable,
                messages::SERVICE_UNAVAILABLE.to_string(),
            ),
            other => (ErrorCode::HttpError, format!("HTTP Error {other}")),
        };

        NormalizedError::new(
            code,
            message,
            Some(json!({ "statusCode": status, "response": body })),
            Some(status),
        )
    }

    fn classify_remote_data(failure: &RemoteDataFailure) -> NormalizedError {
        let (code, message) = match failure.code.as_deref() {
            Some("PGRST116") => (ErrorCode::NotFound, "Record not found"),
            Some("23505") => (ErrorCode::DuplicateError, "Record already exists"),
            Some("23503") => (ErrorCode::ForeignKeyError, "Referenced record not found"),
            Some("42501") => (ErrorCode::PermissionDenied, "Permission denied"),
            _ => (
                ErrorCode::DatabaseError,
                failure
                    .message
                    .as_deref()
                    .filter(|message| !message.is_empty())
                    .unwrap_or(messages::DATABASE_ERROR),
            ),
        };

        NormalizedError::new(code, message, serde_json::to_value(failure).ok(), None)
    }

    // =========================================================================
    // Recording, logging and forwarding
    // =========================================================================

    fn record(&self, error: NormalizedError, context: Option<&str>) -> NormalizedError {
        if let Some(evicted) = self.lock_history().push(error.clone()) {
            log_trace!(
                evicted_code = %evicted.code(),
                evicted_timestamp = %evicted.timestamp(),
                "Error history full, oldest entry evicted"
            );
        }

        if !self.forwards_to_sink() {
            Self::log_detail(&error, context);
        } else {
            log_debug!(
                error_code = %error.code(),
                context = context.unwrap_or_default(),
                "Forwarding normalized error to log sink"
            );
            self.forward(SinkRecord::new(error.clone(), context, &self.config.origin));
        }

        error
    }

    /// Production with a sink forwards; everything else logs locally
    pub(crate) fn forwards_to_sink(&self) -> bool {
        !self.config.is_development() && self.sink.is_some()
    }

    fn log_detail(error: &NormalizedError, context: Option<&str>) {
        let details = error
            .details()
            .map(Value::to_string)
            .unwrap_or_default();
        let context = context.unwrap_or_default();

        match error.code().severity() {
            ErrorSeverity::Critical | ErrorSeverity::Error => log_error!(
                error_code = %error.code(),
                message = %error.message(),
                details = %details,
                status_code = ?error.status_code(),
                context = %context,
                timestamp = %error.timestamp(),
                "Normalized error"
            ),
            ErrorSeverity::Warning => log_warn!(
                error_code = %error.code(),
                message = %error.message(),
                details = %details,
                status_code = ?error.status_code(),
                context = %context,
                timestamp = %error.timestamp(),
                "Normalized error"
            ),
            ErrorSeverity::Info => log_info!(
                error_code = %error.code(),
                message = %error.message(),
                details = %details,
                status_code = ?error.status_code(),
                context = %context,
                timestamp = %error.timestamp(),
                "Normalized error"
            ),
        }
    }

    /// Spawn a detached delivery task; its outcome never reaches the caller
    fn forward(&self, record: SinkRecord) {
        let Some(sink) = self.sink.clone() else {
            log_debug!(
                report_id = %record.report_id,
                "No log sink configured; error record not forwarded"
            );
            return;
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log_warn!(
                report_id = %record.report_id,
                error_code = %record.error.code(),
                "No async runtime available; error record not forwarded"
            );
            return;
        };

        let timeout = self.sink_timeout();
        runtime.spawn(async move {
            match tokio::time::timeout(timeout, sink.send(&record)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => log_warn!(
                    report_id = %record.report_id,
                    error = %e,
                    "Failed to send error to log sink; record dropped"
                ),
                Err(_) => log_warn!(
                    report_id = %record.report_id,
                    timeout_ms = duration_millis(timeout),
                    "Log sink did not answer in time; record dropped"
                ),
            }
        });
    }

    fn sink_timeout(&self) -> Duration {
        self.config
            .sink
            .as_ref()
            .map_or(DEFAULT_SINK_TIMEOUT, |sink| sink.timeout)
    }

    fn lock_history(&self) -> MutexGuard<'_, ErrorHistory> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
