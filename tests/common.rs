//! Test helper utilities for error-normalizer integration tests
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

// Allow dead code in test utilities - functions are used across different test files
#![allow(dead_code)]

use error_normalizer::{Environment, ErrorNormalizer, NormalizerConfig, SinkConfig, SinkRecord};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const LOGS_PATH: &str = "/api/logs";

/// Production configuration pointing at a mock server's log endpoint
pub fn production_config(server: &MockServer, timeout: Duration) -> NormalizerConfig {
    NormalizerConfig {
        environment: Environment::Production,
        sink: Some(SinkConfig {
            endpoint: format!("{}{}", server.uri(), LOGS_PATH),
            timeout,
        }),
        origin: "integration-test".to_string(),
        ..NormalizerConfig::default()
    }
}

pub fn production_normalizer(server: &MockServer) -> ErrorNormalizer {
    ErrorNormalizer::new(production_config(server, Duration::from_secs(2)))
        .expect("production config should be valid")
}

/// Mount a log endpoint answering every POST with `status`
pub async fn mount_log_endpoint(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path(LOGS_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Poll the mock server until `count` requests arrived or two seconds pass
pub async fn wait_for_requests(server: &MockServer, count: usize) -> Vec<Request> {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        let requests = server.received_requests().await.unwrap_or_default();
        if requests.len() >= count || tokio::time::Instant::now() >= deadline {
            return requests;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

pub fn decode_record(request: &Request) -> SinkRecord {
    serde_json::from_slice(&request.body).expect("sink body should be a SinkRecord")
}
