//! Error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use smokeduty_shared::AppError;
use tracing::error;

/// Builds a `{error, message}` JSON response.
pub fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into()
        })),
    )
        .into_response()
}

/// Converts an application error into its HTTP response.
///
/// Server-side failures are logged and reported with a generic message.
pub fn app_error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
        error!(error = %err, "Request failed");
        return error_response(status, err.error_code(), "An error occurred");
    }
    error_response(status, err.error_code(), err.to_string())
}
