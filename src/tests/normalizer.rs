// Unit Tests for the Error Normalizer
//
// UNIT UNDER TEST: ErrorNormalizer (development mode)
//
// BUSINESS RESPONSIBILITY:
//   - Classifies failures of any shape into exactly one NormalizedError
//   - Maps HTTP statuses and database error identifiers to fixed codes
//   - Records every normalized error in the bounded history
//   - Never panics, whatever the input
//
// TEST COVERAGE:
//   - Shape-based classification (pass-through, exception, string, unknown)
//   - Full HTTP status table, body overrides and unmapped statuses
//   - Remote database identifier table and fallbacks
//   - Validation map normalization
//   - History recording, eviction through the normalizer, clearing
//   - Async guard wrapper

use crate::core_types::{messages, ErrorCode, Failure, NormalizedError, RemoteDataFailure};
use crate::normalizer::ErrorNormalizer;
use crate::tests::helpers::create_dev_normalizer;
use serde_json::json;
use std::collections::BTreeMap;

#[cfg(test)]
mod normalize_shape_tests {
    use super::*;

    #[test]
    fn test_string_failure_becomes_string_error() {
        // Arrange
        let normalizer = ErrorNormalizer::default();

        // Act
        let err = normalizer.normalize("boom", None);

        // Assert
        assert_eq!(err.code(), &ErrorCode::StringError);
        assert_eq!(err.message(), "boom");
        assert_eq!(err.status_code(), Some(400));
        assert_eq!(err.details(), Some(&json!({ "context": null })));
    }

    #[test]
    fn test_exception_becomes_generic_error_with_stack_and_context() {
        // Arrange
        let normalizer = ErrorNormalizer::default();
        let failure = Failure::Exception {
            message: "cannot read property 'id'".to_string(),
            stack: Some("at Dashboard()".to_string()),
        };

        // Act
        let err = normalizer.normalize(failure, Some("dashboard"));

        // Assert
        assert_eq!(err.code(), &ErrorCode::GenericError);
        assert_eq!(err.message(), "cannot read property 'id'");
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(
            err.details(),
            Some(&json!({ "stack": "at Dashboard()", "context": "dashboard" }))
        );
    }

    #[test]
    fn test_std_error_is_normalized_through_io_conversion() {
        let normalizer = ErrorNormalizer::default();
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");

        let err = normalizer.normalize(io, Some("upload"));

        assert_eq!(err.code(), &ErrorCode::GenericError);
        assert_eq!(err.message(), "read-only");
    }

    #[test]
    fn test_null_and_odd_values_become_unknown_error() {
        // Test verifies inputs of no recognizable shape still yield a full record

        let normalizer = ErrorNormalizer::default();

        for value in [serde_json::Value::Null, json!(42), json!([1, 2]), json!({ "x": 1 })] {
            let err = normalizer.normalize(value.clone(), None);

            assert_eq!(err.code(), &ErrorCode::UnknownError);
            assert_eq!(err.message(), messages::UNKNOWN_ERROR);
            assert_eq!(err.status_code(), Some(500));
            assert!(err.details().is_some());
        }
    }

    #[test]
    fn test_normalized_error_passes_through_unchanged() {
        // Test verifies pass-through keeps every field, timestamp included

        let normalizer = ErrorNormalizer::default();
        let original = NormalizedError::not_found("Tutor");

        let err = normalizer.normalize(original.clone(), Some("ignored"));

        assert_eq!(err, original);
        assert_eq!(err.timestamp(), original.timestamp());
    }

    #[test]
    fn test_normalizing_twice_is_idempotent() {
        let normalizer = ErrorNormalizer::default();

        let first = normalizer.normalize("boom", Some("form"));
        let second = normalizer.normalize(first.clone(), Some("form"));

        assert!(second.same_content(&first));
    }

    #[test]
    fn test_every_shape_populates_required_fields() {
        // Test verifies code, message, details, status and timestamp are always set

        let normalizer = ErrorNormalizer::default();
        let failures: Vec<Failure> = vec![
            "".into(),
            Failure::Exception {
                message: String::new(),
                stack: None,
            },
            Failure::Unknown(None),
            anyhow::anyhow!("nested").into(),
        ];

        for failure in failures {
            let err = normalizer.normalize(failure, None);
            assert!(err.code().is_known());
            assert!(err.details().is_some());
            assert!(err.status_code().is_some());
            assert!(err.timestamp() <= chrono::Utc::now());
        }
    }
}

#[cfg(test)]
mod http_failure_tests {
    use super::*;

    #[test]
    fn test_status_table_maps_to_exact_codes() {
        let normalizer = ErrorNormalizer::default();
        let table = [
            (400, ErrorCode::BadRequest, messages::INVALID_REQUEST),
            (401, ErrorCode::Unauthorized, messages::UNAUTHORIZED),
            (403, ErrorCode::Forbidden, messages::FORBIDDEN),
            (404, ErrorCode::NotFound, messages::NOT_FOUND),
            (422, ErrorCode::ValidationError, messages::VALIDATION_ERROR),
            (429, ErrorCode::RateLimitExceeded, messages::RATE_LIMIT_EXCEEDED),
            (500, ErrorCode::ServerError, messages::SERVER_ERROR),
            (503, ErrorCode::ServiceUnavailable, messages::SERVICE_UNAVAILABLE),
        ];

        for (status, code, message) in table {
            let err = normalizer.normalize_http_failure(status, None);

            assert_eq!(err.code(), &code, "status {status}");
            assert_eq!(err.message(), message, "status {status}");
            assert_eq!(err.status_code(), Some(status));
        }
    }

    #[test]
    fn test_not_found_scenario() {
        let normalizer = ErrorNormalizer::default();

        let err = normalizer.normalize_http_failure(404, None);

        assert_eq!(err.code(), &ErrorCode::NotFound);
        assert_eq!(err.message(), "The requested resource was not found.");
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(
            err.details(),
            Some(&json!({ "statusCode": 404, "response": null }))
        );
    }

    #[test]
    fn test_unmapped_status_embeds_number() {
        let normalizer = ErrorNormalizer::default();

        for status in [402, 418, 502, 504, 999] {
            let err = normalizer.normalize_http_failure(status, None);

            assert_eq!(err.code(), &ErrorCode::HttpError);
            assert_eq!(err.message(), format!("HTTP Error {status}"));
            assert_eq!(err.status_code(), Some(status));
        }
    }

    #[test]
    fn test_body_message_overrides_bad_request_and_validation_text() {
        let normalizer = ErrorNormalizer::default();
        let body = json!({ "message": "Grade level is required" });

        let bad_request = normalizer.normalize_http_failure(400, Some(&body));
        let validation = normalizer.normalize_http_failure(422, Some(&body));

        assert_eq!(bad_request.message(), "Grade level is required");
        assert_eq!(validation.message(), "Grade level is required");
        assert_eq!(validation.details().unwrap()["response"], body);
    }

    #[test]
    fn test_body_message_ignored_for_fixed_text_statuses() {
        let normalizer = ErrorNormalizer::default();
        let body = json!({ "message": "jwt expired" });

        let err = normalizer.normalize_http_failure(401, Some(&body));

        assert_eq!(err.message(), messages::UNAUTHORIZED);
    }

    #[test]
    fn test_empty_body_message_falls_back_to_default() {
        let normalizer = ErrorNormalizer::default();
        let body = json!({ "message": "" });

        let err = normalizer.normalize_http_failure(400, Some(&body));

        assert_eq!(err.message(), messages::INVALID_REQUEST);
    }
}

#[cfg(test)]
mod remote_data_failure_tests {
    use super::*;

    #[test]
    fn test_identifier_table() {
        let normalizer = ErrorNormalizer::default();
        let table = [
            ("PGRST116", ErrorCode::NotFound, "Record not found"),
            ("23505", ErrorCode::DuplicateError, "Record already exists"),
            ("23503", ErrorCode::ForeignKeyError, "Referenced record not found"),
            ("42501", ErrorCode::PermissionDenied, "Permission denied"),
        ];

        for (identifier, code, message) in table {
            let err = normalizer.normalize_remote_data_failure(&RemoteDataFailure::new(identifier));

            assert_eq!(err.code(), &code, "identifier {identifier}");
            assert_eq!(err.message(), message);
            assert_eq!(err.status_code(), None);
        }
    }

    #[test]
    fn test_duplicate_scenario_keeps_failure_as_details() {
        let normalizer = ErrorNormalizer::default();
        let failure = RemoteDataFailure::new("23505").with_message("duplicate key value");

        let err = normalizer.normalize_remote_data_failure(&failure);

        assert_eq!(err.code(), &ErrorCode::DuplicateError);
        assert_eq!(
            err.details(),
            Some(&json!({ "code": "23505", "message": "duplicate key value" }))
        );
    }

    #[test]
    fn test_unrecognized_identifier_uses_failure_message() {
        let normalizer = ErrorNormalizer::default();
        let failure = RemoteDataFailure::new("08006").with_message("connection failure");

        let err = normalizer.normalize_remote_data_failure(&failure);

        assert_eq!(err.code(), &ErrorCode::DatabaseError);
        assert_eq!(err.message(), "connection failure");
    }

    #[test]
    fn test_missing_identifier_and_message_use_generic_text() {
        let normalizer = ErrorNormalizer::default();

        let err = normalizer.normalize_remote_data_failure(&RemoteDataFailure::default());

        assert_eq!(err.code(), &ErrorCode::DatabaseError);
        assert_eq!(err.message(), messages::DATABASE_ERROR);
    }
}

#[cfg(test)]
mod validation_failure_tests {
    use super::*;

    #[test]
    fn test_first_message_of_first_field_is_used() {
        let normalizer = ErrorNormalizer::default();
        let mut errors = BTreeMap::new();
        errors.insert(
            "email".to_string(),
            vec!["Email is required".to_string(), "Email is invalid".to_string()],
        );
        errors.insert("phone".to_string(), vec!["Phone is required".to_string()]);

        let err = normalizer.normalize_validation_failure(&errors);

        assert_eq!(err.code(), &ErrorCode::ValidationError);
        assert_eq!(err.message(), "Email is required");
        assert_eq!(err.status_code(), Some(400));
        assert_eq!(err.details().unwrap()["phone"][0], "Phone is required");
    }

    #[test]
    fn test_empty_map_uses_generic_text() {
        let normalizer = ErrorNormalizer::default();

        let err = normalizer.normalize_validation_failure(&BTreeMap::new());

        assert_eq!(err.message(), messages::VALIDATION_FAILED);
    }
}

#[cfg(test)]
mod history_recording_tests {
    use super::*;

    #[test]
    fn test_every_operation_records_to_history() {
        let normalizer = ErrorNormalizer::default();

        normalizer.normalize("a", None);
        normalizer.normalize_http_failure(500, None);
        normalizer.normalize_remote_data_failure(&RemoteDataFailure::new("42501"));
        normalizer.normalize_validation_failure(&BTreeMap::new());

        let codes: Vec<ErrorCode> = normalizer
            .history()
            .iter()
            .map(|e| e.code().clone())
            .collect();
        assert_eq!(
            codes,
            vec![
                ErrorCode::StringError,
                ErrorCode::ServerError,
                ErrorCode::PermissionDenied,
                ErrorCode::ValidationError,
            ]
        );
    }

    #[test]
    fn test_history_keeps_most_recent_hundred() {
        // Test verifies FIFO eviction through the public normalizer API

        let normalizer = ErrorNormalizer::default();

        for n in 0..130 {
            normalizer.normalize(format!("failure {n}"), None);
        }

        let history = normalizer.history();
        assert_eq!(history.len(), 100);
        assert_eq!(history.first().unwrap().message(), "failure 30");
        assert_eq!(history.last().unwrap().message(), "failure 129");
    }

    #[test]
    fn test_configured_capacity_is_respected() {
        let normalizer = create_dev_normalizer(3);

        for n in 0..5 {
            normalizer.normalize(format!("failure {n}"), None);
        }

        let messages: Vec<String> = normalizer
            .history()
            .iter()
            .map(|e| e.message().to_string())
            .collect();
        assert_eq!(messages, vec!["failure 2", "failure 3", "failure 4"]);
    }

    #[test]
    fn test_clear_history() {
        let normalizer = ErrorNormalizer::default();
        normalizer.normalize("a", None);

        normalizer.clear_history();

        assert!(normalizer.history().is_empty());
    }

    #[test]
    fn test_friendly_message_delegates_to_record() {
        let normalizer = ErrorNormalizer::default();
        let err = normalizer.normalize_http_failure(403, None);

        assert_eq!(normalizer.friendly_message(&err), messages::FORBIDDEN);
    }

    #[test]
    fn test_report_without_sink_is_noop() {
        let normalizer = ErrorNormalizer::default();
        let err = NormalizedError::network(None);

        normalizer.report(&err, Some("page froze"));

        assert!(normalizer.history().is_empty(), "reports are not history events");
    }
}

#[cfg(test)]
mod guard_tests {
    use super::*;

    #[tokio::test]
    async fn test_guard_passes_success_through() {
        let normalizer = ErrorNormalizer::default();

        let result = normalizer
            .guard("load", async { Ok::<_, anyhow::Error>(7) })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert!(normalizer.history().is_empty());
    }

    #[tokio::test]
    async fn test_guard_normalizes_error_with_context() {
        let normalizer = ErrorNormalizer::default();

        let result: Result<(), NormalizedError> = normalizer
            .guard("submit_request", async {
                Err(anyhow::anyhow!("insert rejected"))
            })
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.code(), &ErrorCode::GenericError);
        assert_eq!(err.message(), "insert rejected");
        assert_eq!(err.details().unwrap()["context"], "submit_request");
        assert_eq!(normalizer.history().len(), 1);
    }
}
