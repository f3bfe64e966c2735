//! User-facing message texts
//!
//! These strings are the only error text that reaches end users. Internal
//! details stay in `details` and in the logs.

pub const NETWORK_ERROR: &str = "Network error. Please check your connection.";
pub const UNAUTHORIZED: &str = "Please log in to access this feature.";
pub const FORBIDDEN: &str = "You do not have permission to perform this action.";
pub const NOT_FOUND: &str = "The requested resource was not found.";
pub const VALIDATION_ERROR: &str = "Please check your input and try again.";
pub const SERVER_ERROR: &str = "Something went wrong. Please try again later.";
pub const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";
pub const RATE_LIMIT_EXCEEDED: &str = "Too many requests. Please try again later.";
pub const SERVICE_UNAVAILABLE: &str = "Service temporarily unavailable. Please try again later.";

pub const INVALID_REQUEST: &str = "Invalid request";
pub const UNKNOWN_ERROR: &str = "An unknown error occurred";
pub const VALIDATION_FAILED: &str = "Validation failed";
pub const DATABASE_ERROR: &str = "Database error";

/// Last-resort text when neither the code nor the message helps.
pub const FALLBACK: &str = "An unexpected error occurred";

/// Look up the user-facing text for a wire code.
///
/// Takes the wire name rather than an [`ErrorCode`](super::ErrorCode) so
/// that codes outside the taxonomy (`SESSION_EXPIRED`) still resolve.
pub fn friendly_text(code: &str) -> Option<&'static str> {
    match code {
        "NETWORK_ERROR" => Some(NETWORK_ERROR),
        "UNAUTHORIZED" => Some(UNAUTHORIZED),
        "FORBIDDEN" => Some(FORBIDDEN),
        "NOT_FOUND" => Some(NOT_FOUND),
        "VALIDATION_ERROR" => Some(VALIDATION_ERROR),
        "SERVER_ERROR" => Some(SERVER_ERROR),
        "SESSION_EXPIRED" => Some(SESSION_EXPIRED),
        "RATE_LIMIT_EXCEEDED" => Some(RATE_LIMIT_EXCEEDED),
        "SERVICE_UNAVAILABLE" => Some(SERVICE_UNAVAILABLE),
        _ => None,
    }
}
