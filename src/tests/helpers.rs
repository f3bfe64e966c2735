//! Test helper utilities for error-normalizer unit tests
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

#![allow(dead_code)]

use crate::config::{Environment, NormalizerConfig, SinkConfig};
use crate::core_types::{ErrorCode, NormalizedError};
use crate::normalizer::ErrorNormalizer;
use std::time::Duration;

/// Development-mode normalizer with the given history capacity
pub fn create_dev_normalizer(history_capacity: usize) -> ErrorNormalizer {
    let config = NormalizerConfig {
        history_capacity,
        ..NormalizerConfig::default()
    };
    ErrorNormalizer::new(config).expect("development config should be valid")
}

/// Production configuration with a short sink timeout suitable for tests
pub fn create_production_config(timeout: Duration) -> NormalizerConfig {
    NormalizerConfig {
        environment: Environment::Production,
        sink: Some(SinkConfig {
            endpoint: "http://127.0.0.1:9/api/logs".to_string(),
            timeout,
        }),
        origin: "unit-test".to_string(),
        ..NormalizerConfig::default()
    }
}

/// Record with a distinguishable message, for ordering checks
pub fn numbered_error(n: usize) -> NormalizedError {
    NormalizedError::new(ErrorCode::GenericError, format!("error #{n}"), None, Some(500))
}
