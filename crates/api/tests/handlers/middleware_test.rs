use axum::{body::to_bytes, http::StatusCode};
use eventsched_api::middleware::error_handling::{AppError, map_error};
use eventsched_core::errors::SchedulingError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::Value;

fn timestamp_error() -> SchedulingError {
    let source = chrono::DateTime::parse_from_rfc3339("noon").unwrap_err();
    SchedulingError::InvalidTimestamp {
        value: "noon".to_string(),
        source,
    }
}

#[rstest]
#[case::validation(SchedulingError::validation("title is required"), StatusCode::BAD_REQUEST)]
#[case::timezone(SchedulingError::InvalidTimezone("Mars/Olympus".to_string()), StatusCode::BAD_REQUEST)]
#[case::timestamp(timestamp_error(), StatusCode::BAD_REQUEST)]
#[case::not_found(SchedulingError::NotFound("event 1".to_string()), StatusCode::NOT_FOUND)]
#[case::storage(
    SchedulingError::Storage(eyre::eyre!("connection reset")),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn test_error_status_mapping(#[case] err: SchedulingError, #[case] expected: StatusCode) {
    let response = map_error(err);
    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn test_error_body_carries_message() {
    let response = map_error(SchedulingError::NotFound("event 42".to_string()));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["error"], "Resource not found: event 42");
}

#[test]
fn test_eyre_reports_become_server_errors() {
    let err: AppError = eyre::eyre!("pool timed out").into();
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
