//! Health check endpoint handler.
//!
//! Reports liveness plus how many configured adapters can actually deliver.
//! Always answers 200, with `degraded` when some adapters are disabled.

use axum::{Json, Router, extract::State, routing::get};
use jiff::Timestamp;

use crate::api::dto::{AdapterCounts, HealthResponse};
use crate::state::AppState;

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let adapters = AdapterCounts {
        configured: state.dispatcher.adapters().len(),
        enabled: state.dispatcher.enabled_count(),
    };

    Json(HealthResponse {
        status: adapters.status(),
        version: state.application.version.clone(),
        timestamp: Timestamp::now().to_string(),
        adapters,
    })
}
