//! Error handler for converting AppError to HTTP responses.
//!
//! Delivery failures never reach this module during normal dispatch: the
//! dispatcher records them in its report. What does arrive here is malformed
//! input and unexpected internal failures.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl IntoResponse for AppError {
    /// # Status Code Mapping
    /// - Validation → 400 BAD_REQUEST
    /// - BadRequest → 400 BAD_REQUEST
    /// - Serialization → 400 BAD_REQUEST
    /// - Transport → 502 BAD_GATEWAY
    /// - Delivery → 502 BAD_GATEWAY
    /// - Configuration → 500 INTERNAL_SERVER_ERROR
    /// - Internal → 500 INTERNAL_SERVER_ERROR
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        let error_response = match &self {
            AppError::Validation { field, reason } => {
                ErrorResponse::new("VALIDATION_ERROR", reason).with_details(field)
            }
            AppError::BadRequest { message } => ErrorResponse::new("BAD_REQUEST", message),
            AppError::Serialization { source } => {
                ErrorResponse::new("SERIALIZATION_ERROR", "Payload could not be processed")
                    .with_details(&source.to_string())
            }
            AppError::Transport { service, .. } => ErrorResponse::new(
                "TRANSPORT_ERROR",
                &format!("Could not reach {}", service),
            ),
            AppError::Delivery {
                service, status, ..
            } => ErrorResponse::new(
                "DELIVERY_ERROR",
                &format!("{} rejected the notification with status {}", service, status),
            ),
            AppError::Configuration { key, .. } => ErrorResponse::new(
                "CONFIGURATION_ERROR",
                &format!("Configuration error: {}", key),
            ),
            AppError::Internal { source } => {
                tracing::error!(error = %source, "Internal error while handling request");
                ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred")
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Maps an AppError variant to its HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::Validation { .. }
        | AppError::BadRequest { .. }
        | AppError::Serialization { .. } => StatusCode::BAD_REQUEST,
        AppError::Transport { .. } | AppError::Delivery { .. } => StatusCode::BAD_GATEWAY,
        AppError::Configuration { .. } | AppError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Converts axum JSON rejection errors to ErrorResponse.
pub fn handle_json_rejection(rejection: JsonRejection) -> Response {
    let (status, error_response) = match rejection {
        JsonRejection::JsonDataError(err) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("INVALID_JSON", "Invalid JSON format")
                .with_details(&err.body_text()),
        ),
        JsonRejection::JsonSyntaxError(err) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("JSON_SYNTAX_ERROR", "JSON syntax error")
                .with_details(&err.body_text()),
        ),
        JsonRejection::MissingJsonContentType(_) => (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorResponse::new(
                "MISSING_CONTENT_TYPE",
                "Expected request with `Content-Type: application/json`",
            ),
        ),
        JsonRejection::BytesRejection(_) => (
            StatusCode::PAYLOAD_TOO_LARGE,
            ErrorResponse::new("REQUEST_TOO_LARGE", "Request body could not be read"),
        ),
        other => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("JSON_ERROR", "Failed to process JSON").with_details(&other.body_text()),
        ),
    };

    (status, Json(error_response)).into_response()
}
