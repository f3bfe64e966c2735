//! External logging sink
//!
//! The sink is the normalizer's only outbound collaborator. Records are
//! POSTed as JSON; delivery is best effort and failures never travel back
//! to the code that produced the error.

use crate::config::SinkConfig;
use crate::core_types::NormalizedError;
use crate::error::{NormalizerError, NormalizerResult};
use crate::logging::log_debug;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;
use uuid::Uuid;

/// Serialized form of a forwarded error
///
/// The normalized error's own fields are flattened into the top level, so a
/// collector sees `code`, `message`, `details`, `statusCode` and `timestamp`
/// next to the delivery metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinkRecord {
    /// Unique id of this delivery
    pub report_id: Uuid,
    #[serde(flatten)]
    pub error: NormalizedError,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Process label from the normalizer configuration
    pub origin: String,
    /// Free-text feedback attached by an explicit report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_feedback: Option<String>,
    /// Set only on explicit reports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_at: Option<DateTime<Utc>>,
}

impl SinkRecord {
    pub fn new(error: NormalizedError, context: Option<&str>, origin: &str) -> Self {
        Self {
            report_id: Uuid::new_v4(),
            error,
            context: context.map(str::to_string),
            origin: origin.to_string(),
            user_feedback: None,
            reported_at: None,
        }
    }

    /// Mark the record as an explicit report carrying optional feedback
    pub fn reported(mut self, user_feedback: Option<&str>) -> Self {
        self.user_feedback = user_feedback.map(str::to_string);
        self.reported_at = Some(Utc::now());
        self
    }
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`
pub(crate) fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Destination for forwarded error records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LogSink: Send + Sync + Debug {
    /// Deliver one record
    ///
    /// # Errors
    ///
    /// Returns a sink error when the record could not be delivered. Callers
    /// inside the normalizer log and drop it.
    async fn send(&self, record: &SinkRecord) -> NormalizerResult<()>;
}

/// Sink POSTing JSON records to an HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpLogSink {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpLogSink {
    /// Create a sink from validated configuration
    ///
    /// # Errors
    ///
    /// Returns [`NormalizerError::ConfigurationError`] if the configuration
    /// is invalid or the HTTP client cannot be built.
    pub fn new(config: &SinkConfig) -> NormalizerResult<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                NormalizerError::configuration_error(format!("Failed to build HTTP client: {e}"))
            })?;

        log_debug!(
            endpoint = %config.endpoint,
            timeout_ms = duration_millis(config.timeout),
            "HTTP log sink initialized"
        );

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            timeout: config.timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LogSink for HttpLogSink {
    async fn send(&self, record: &SinkRecord) -> NormalizerResult<()> {
        let body = serde_json::to_vec(record)
            .map_err(|e| NormalizerError::serialization_failed(e.to_string()))?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NormalizerError::sink_timeout(duration_millis(self.timeout))
                } else {
                    NormalizerError::sink_request_failed(
                        format!("Request to {} failed: {e}", self.endpoint),
                        Some(Box::new(e)),
                    )
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NormalizerError::sink_rejected(status.as_u16()));
        }

        log_debug!(
            report_id = %record.report_id,
            error_code = %record.error.code(),
            "Error record delivered to log sink"
        );
        Ok(())
    }
}
