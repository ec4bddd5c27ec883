//! # Error Handling Middleware
//!
//! Maps [`SchedulingError`] values onto HTTP status codes and a JSON body of
//! the form `{"error": "<message>"}`, so every handler reports failures the
//! same way.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use eventsched_core::errors::SchedulingError;
use serde_json::json;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// Handlers return `Result<_, AppError>` and use `?` on any call that yields
/// a `SchedulingResult`.
///
/// # Example
///
/// ```
/// use axum::Json;
/// use eventsched_api::middleware::error_handling::AppError;
/// use eventsched_core::errors::SchedulingError;
///
/// async fn handler(id: String) -> Result<Json<String>, AppError> {
///     if id.is_empty() {
///         return Err(SchedulingError::validation("event id is required").into());
///     }
///     Ok(Json(id))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub SchedulingError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            SchedulingError::Validation(_)
            | SchedulingError::InvalidTimezone(_)
            | SchedulingError::InvalidTimestamp { .. } => StatusCode::BAD_REQUEST,
            SchedulingError::NotFound(_) => StatusCode::NOT_FOUND,
            SchedulingError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = ?self.0, "request failed");
        }

        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        AppError(err)
    }
}

/// Unexpected failures outside the scheduling layer are reported as storage
/// errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(SchedulingError::Storage(err))
    }
}

/// Maps a SchedulingError directly to an HTTP response
pub fn map_error(err: SchedulingError) -> Response {
    AppError(err).into_response()
}
