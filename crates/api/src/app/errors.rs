use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

/// Fixed-message JSON error body: `{"message": "..."}`.
pub fn json_message(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Generic 500 for endpoints that do not define a specific failure message.
///
/// The cause is logged, never echoed to the client.
pub fn internal_error(err: impl std::fmt::Display) -> axum::response::Response {
    tracing::error!(error = %err, "request failed");
    json_message(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}
