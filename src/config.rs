use crate::error::{NormalizerError, NormalizerResult};
use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::logging::log_debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default time budget for a single forward to the logging sink.
pub const DEFAULT_SINK_TIMEOUT: Duration = Duration::from_secs(5);

/// Deployment mode, selecting how normalized errors are logged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Full structured detail goes to the local log; nothing is forwarded
    #[default]
    Development,
    /// Records are forwarded to the configured sink
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Environment {
    type Err = NormalizerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(NormalizerError::configuration_error(format!(
                "Unsupported environment: {other}. Supported environments: development, production"
            ))),
        }
    }
}

/// External logging sink configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Endpoint receiving POSTed JSON records
    pub endpoint: String,
    /// Upper bound for one forwarding attempt
    pub timeout: Duration,
}

impl SinkConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: DEFAULT_SINK_TIMEOUT,
        }
    }

    /// Validate sink configuration
    ///
    /// # Errors
    ///
    /// Returns [`NormalizerError::ConfigurationError`] if:
    /// - The endpoint is not an absolute http(s) URL
    /// - The timeout is zero
    pub fn validate(&self) -> NormalizerResult<()> {
        let url = reqwest::Url::parse(&self.endpoint).map_err(|e| {
            NormalizerError::configuration_error(format!(
                "Invalid sink endpoint '{}': {e}",
                self.endpoint
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(NormalizerError::configuration_error(format!(
                "Sink endpoint must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.timeout.is_zero() {
            return Err(NormalizerError::configuration_error(
                "Sink timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Normalizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    pub environment: Environment,
    /// Maximum number of errors retained in memory
    pub history_capacity: usize,
    /// Where production records are forwarded; `None` disables forwarding
    pub sink: Option<SinkConfig>,
    /// Label identifying this process in forwarded records
    pub origin: String,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            sink: None,
            origin: "server".to_string(),
        }
    }
}

impl NormalizerConfig {
    /// Production configuration forwarding to `endpoint` with default settings
    pub fn production(endpoint: impl Into<String>) -> Self {
        Self {
            environment: Environment::Production,
            sink: Some(SinkConfig::new(endpoint)),
            ..Self::default()
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Validate the configuration is complete
    ///
    /// # Errors
    ///
    /// Returns [`NormalizerError::ConfigurationError`] if the history
    /// capacity is zero or the sink configuration is invalid.
    pub fn validate(&self) -> NormalizerResult<()> {
        if self.history_capacity == 0 {
            return Err(NormalizerError::configuration_error(
                "History capacity must be greater than zero",
            ));
        }
        if let Some(sink) = &self.sink {
            sink.validate()?;
        }
        Ok(())
    }

    /// Load configuration from environment variables
    /// This is the ONLY method that should access environment variables
    ///
    /// | Variable | Meaning | Default |
    /// |----------|---------|---------|
    /// | `APP_ENV` | `development` or `production` | `development` |
    /// | `ERROR_HISTORY_CAPACITY` | retained errors | `100` |
    /// | `ERROR_SINK_URL` | sink endpoint | unset (no forwarding) |
    /// | `ERROR_SINK_TIMEOUT_MS` | per-forward timeout | `5000` |
    /// | `ERROR_ORIGIN` | origin label | `server` |
    ///
    /// # Errors
    ///
    /// Returns [`NormalizerError::ConfigurationError`] if a variable holds an
    /// unparseable value or the resulting configuration fails validation.
    pub fn from_env() -> NormalizerResult<Self> {
        let mut config = Self::default();

        if let Ok(environment) = std::env::var("APP_ENV") {
            config.environment = environment.parse()?;
        }
        if let Some(capacity) = Self::parse_env::<usize>("ERROR_HISTORY_CAPACITY")? {
            config.history_capacity = capacity;
        }
        if let Ok(endpoint) = std::env::var("ERROR_SINK_URL") {
            let mut sink = SinkConfig::new(endpoint);
            if let Some(timeout_ms) = Self::parse_env::<u64>("ERROR_SINK_TIMEOUT_MS")? {
                sink.timeout = Duration::from_millis(timeout_ms);
            }
            config.sink = Some(sink);
        }
        if let Ok(origin) = std::env::var("ERROR_ORIGIN") {
            config.origin = origin;
        }

        config.validate()?;

        log_debug!(
            environment = %config.environment,
            history_capacity = config.history_capacity,
            has_sink = config.sink.is_some(),
            origin = %config.origin,
            "Normalizer configuration loaded and validated"
        );

        Ok(config)
    }

    fn parse_env<T: FromStr>(key: &str) -> NormalizerResult<Option<T>> {
        match std::env::var(key) {
            Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
                NormalizerError::configuration_error(format!("Invalid value for {key}: '{raw}'"))
            }),
            Err(_) => Ok(None),
        }
    }
}
