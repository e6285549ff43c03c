//! Hook receiver: one inbound event, one dispatch cycle.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::Value;

use crate::api::dto::DispatchResponse;
use crate::api::middleware::handle_json_rejection;
use crate::models::Payload;
use crate::state::AppState;

/// # Routes
/// - `POST /` - receive an event
/// - `POST /hooks` - same, for senders that need a path
pub fn hook_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(receive_hook))
        .route("/hooks", post(receive_hook))
}

/// Dispatches the posted payload to every adapter.
///
/// Answers 200 with the per-adapter report even when some adapters failed.
pub async fn receive_hook(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(value) = match body {
        Ok(json) => json,
        Err(rejection) => return handle_json_rejection(rejection),
    };

    let payload = match Payload::from_value(value) {
        Ok(payload) => payload,
        Err(e) => return e.into_response(),
    };

    let report = state.dispatcher.dispatch(&payload).await;
    if report.has_failures() {
        tracing::warn!(
            failed = report.failed(),
            delivered = report.delivered(),
            "Some notifications failed"
        );
    }

    Json(DispatchResponse::from(report)).into_response()
}
