//! Error handling example demonstrating normalization, friendly messages and history.
//!
//! This example shows how to:
//! - Normalize strings, errors, HTTP statuses and database failures
//! - Route on error category and retry guidance
//! - Show users friendly messages instead of internal details
//! - Inspect the bounded error history
//!
//! # Running
//!
//! ```bash
//! # Development mode: errors are logged locally
//! cargo run --example error_handling
//!
//! # Production mode: errors are forwarded to a log endpoint
//! APP_ENV=production ERROR_SINK_URL=http://localhost:8080/api/logs \
//!     cargo run --example error_handling
//! ```

use error_normalizer::{
    ErrorCategory, ErrorNormalizer, NormalizedError, NormalizerConfig, RemoteDataFailure,
};
use std::collections::BTreeMap;
use std::time::Duration;

fn print_error_info(label: &str, normalizer: &ErrorNormalizer, err: &NormalizedError) {
    println!("{label}:");
    println!("  code:      {}", err.code());
    println!("  message:   {}", err.message());
    println!("  status:    {:?}", err.status_code());
    println!("  category:  {:?}", err.code().category());
    println!("  retryable: {}", err.code().is_retryable());
    println!("  user sees: {}", normalizer.friendly_message(err));

    match err.code().category() {
        ErrorCategory::Transient => println!("  -> retry with backoff"),
        ErrorCategory::Client => println!("  -> ask the user to fix the input"),
        _ => println!("  -> log for investigation"),
    }
    println!();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = NormalizerConfig::from_env()?;
    println!("=== Running in {} mode ===\n", config.environment);
    let normalizer = ErrorNormalizer::new(config)?;

    let err = normalizer.normalize("Subject is required", Some("post-skill-request"));
    print_error_info("String failure", &normalizer, &err);

    let err = normalizer.normalize(
        anyhow::anyhow!("connection reset by peer").context("loading dashboard"),
        Some("dashboard"),
    );
    print_error_info("Error chain", &normalizer, &err);

    for status in [401, 404, 429, 503, 418] {
        let err = normalizer.normalize_http_failure(status, None);
        print_error_info(&format!("HTTP {status}"), &normalizer, &err);
    }

    let err = normalizer.normalize_remote_data_failure(
        &RemoteDataFailure::new("23505").with_message("duplicate key value violates unique constraint"),
    );
    print_error_info("Database failure", &normalizer, &err);

    let mut field_errors = BTreeMap::new();
    field_errors.insert(
        "grade_level".to_string(),
        vec!["Please choose a grade level".to_string()],
    );
    let err = normalizer.normalize_validation_failure(&field_errors);
    print_error_info("Form validation", &normalizer, &err);

    println!("=== History ({} entries) ===", normalizer.history().len());
    for entry in normalizer.history() {
        println!("  {} {}", entry.timestamp().format("%H:%M:%S%.3f"), entry);
    }

    // Give detached forwarding tasks a moment before the runtime shuts down
    tokio::time::sleep(Duration::from_millis(200)).await;
    Ok(())
}
