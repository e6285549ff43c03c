//! Request timeout middleware.

use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::dto::ErrorResponse;
use crate::state::AppState;

/// Aborts requests that run longer than `server.request_timeout`.
///
/// Deliveries already handed to the transport are not recalled.
pub async fn timeout_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    match tokio::time::timeout(state.request_timeout, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(
                timeout_secs = state.request_timeout.as_secs(),
                "Request timed out"
            );
            (
                StatusCode::GATEWAY_TIMEOUT,
                Json(ErrorResponse::new(
                    "REQUEST_TIMEOUT",
                    "Dispatch did not finish in time",
                )),
            )
                .into_response()
        }
    }
}
