//! # error-normalizer
//!
//! Converts heterogeneous failures into one uniform, display-ready error record.
//!
//! ## Key Features
//!
//! - **One record shape**: exceptions, strings, HTTP responses, database error
//!   codes and form validation maps all become a [`NormalizedError`]
//! - **Fixed taxonomy**: every record carries an [`ErrorCode`] with category,
//!   severity and retry guidance
//! - **Friendly messages**: user-facing text that never leaks internal details
//! - **Bounded history**: the most recent errors are kept in a FIFO queue
//! - **Remote logging**: production records are forwarded to an HTTP sink as
//!   detached, time-bounded, best-effort tasks
//!
//! ## Example
//!
//! ```rust,no_run
//! use error_normalizer::{ErrorNormalizer, NormalizerConfig, RemoteDataFailure};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let normalizer = ErrorNormalizer::new(NormalizerConfig::production(
//!     "https://logs.example.com/api/logs",
//! ))?;
//!
//! let err = normalizer.normalize_remote_data_failure(&RemoteDataFailure::new("23505"));
//! println!("{}", normalizer.friendly_message(&err));
//! # Ok(())
//! # }
//! ```

// Allow missing errors documentation - errors are self-documenting via type signatures
#![allow(clippy::missing_errors_doc)]

pub mod core_types;

// Logging utilities (re-exports tracing with log_* naming) - internal only
pub(crate) mod logging;

pub mod config;
pub mod error;
pub mod history;
pub mod normalizer;
pub mod sink;

#[cfg(test)]
pub mod tests;

// Re-export main types
pub use config::{Environment, NormalizerConfig, SinkConfig};
pub use error::{NormalizerError, NormalizerResult};
pub use history::ErrorHistory;
pub use normalizer::ErrorNormalizer;
pub use sink::{HttpLogSink, LogSink, SinkRecord};

pub use core_types::{
    ErrorCategory, ErrorCode, ErrorSeverity, Failure, NormalizedError, RemoteDataFailure,
};
