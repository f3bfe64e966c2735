//! Core types for error normalization
//!
//! ## Organization
//! - `codes` - The fixed error code taxonomy with category and severity
//! - `record` - The immutable `NormalizedError` record
//! - `failure` - Input shapes accepted by the normalizer
//! - `messages` - User-facing message texts

pub mod codes;
pub mod failure;
pub mod messages;
pub mod record;

// Re-export commonly used types
pub use codes::{ErrorCategory, ErrorCode, ErrorSeverity};
pub use failure::{Failure, RemoteDataFailure};
pub use record::NormalizedError;
