//! Router configuration for the hook receiver.

use axum::{Router, middleware};

use crate::api::handlers;
use crate::api::middleware::{logging_middleware, request_id_middleware, timeout_middleware};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. Request ID middleware - generates/propagates request IDs
/// 2. Logging middleware - logs requests with request IDs
/// 3. Timeout middleware - bounds handler time by `server.request_timeout`
///
/// # Routes
/// - `POST /`, `POST /hooks` - event receiver
/// - `GET /health` - health check
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::hooks::hook_routes())
        .merge(handlers::health::health_routes())
        .layer(middleware::from_fn_with_state(state.clone(), timeout_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApplicationConfig;
    use crate::external::testing::RecordingTransport;
    use crate::external::{HttpTransport, OutboundRequest, TransportResponse};
    use crate::models::{FlowdockOptions, ServiceConfig, SlackOptions, WebhookOptions};
    use crate::services::Dispatcher;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    const SLACK_URL: &str = "https://hooks.slack.com/services/T000/B000/XXXX";
    const WEBHOOK_URL: &str = "http://sprint.ly";

    fn services() -> Vec<ServiceConfig> {
        vec![
            ServiceConfig::Slack(SlackOptions {
                url: Some(SLACK_URL.to_string()),
                ..Default::default()
            }),
            ServiceConfig::Webhook(WebhookOptions {
                urls: Some(vec![WEBHOOK_URL.to_string()]),
            }),
            ServiceConfig::Flowdock(FlowdockOptions::default()),
        ]
    }

    fn app(transport: Arc<RecordingTransport>) -> Router {
        let dispatcher = Dispatcher::from_configs(&services(), transport);
        create_router(AppState::new(dispatcher, ApplicationConfig::default()))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_hook_dispatches_to_every_adapter() {
        let transport = Arc::new(RecordingTransport::new());
        let payload = json!({"type": "story", "number": 7, "title": "Ship it", "action": "created"});

        let response = app(transport.clone())
            .oneshot(post_json("/", &payload.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["delivered"], 2);
        assert_eq!(body["skipped"], 1);
        assert_eq!(body["failed"], 0);
        assert_eq!(body["results"][2]["status"], "skipped");
        assert_eq!(body["results"][2]["reason"], "disabled");

        let mut urls = transport.urls();
        urls.sort();
        assert_eq!(urls, vec![WEBHOOK_URL.to_string(), SLACK_URL.to_string()]);
        let requests = transport.requests();
        let webhook = requests.iter().find(|r| r.url == WEBHOOK_URL).unwrap();
        assert_eq!(webhook.body, Some(payload));
    }

    #[tokio::test]
    async fn test_hooks_path_filters_by_action() {
        let transport = Arc::new(RecordingTransport::new());

        let response = app(transport.clone())
            .oneshot(post_json("/hooks", r#"{"title": "x", "action": "deleted"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["results"][0]["reason"], "action_filtered");
        assert_eq!(transport.urls(), vec![WEBHOOK_URL.to_string()]);
    }

    #[tokio::test]
    async fn test_null_action_reaches_only_unfiltered_adapters() {
        let transport = Arc::new(RecordingTransport::new());

        let response = app(transport.clone())
            .oneshot(post_json("/", r#"{"title": "x", "action": null}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["delivered"], 1);
        assert_eq!(body["results"][0]["reason"], "action_filtered");
        assert_eq!(transport.urls(), vec![WEBHOOK_URL.to_string()]);
    }

    #[tokio::test]
    async fn test_partial_failure_still_returns_ok() {
        let transport = Arc::new(RecordingTransport::new().with_status(SLACK_URL, 500));

        let response = app(transport.clone())
            .oneshot(post_json("/", r#"{"action": "created"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["failed"], 1);
        assert_eq!(body["delivered"], 1);
        assert_eq!(body["results"][0]["status"], "failed");
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let transport = Arc::new(RecordingTransport::new());

        let response = app(transport.clone())
            .oneshot(post_json("/", "{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "JSON_SYNTAX_ERROR");
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_non_object_payload_is_rejected() {
        let transport = Arc::new(RecordingTransport::new());

        let response = app(transport.clone())
            .oneshot(post_json("/", "[1, 2, 3]"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(transport.call_count(), 0);
    }

    struct StalledTransport;

    #[async_trait::async_trait]
    impl HttpTransport for StalledTransport {
        async fn submit(&self, _request: &OutboundRequest) -> anyhow::Result<TransportResponse> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(TransportResponse { status: 200 })
        }
    }

    #[tokio::test]
    async fn test_slow_dispatch_times_out() {
        let dispatcher = Dispatcher::from_configs(&services(), Arc::new(StalledTransport));
        let state = AppState::new(dispatcher, ApplicationConfig::default())
            .with_request_timeout(Duration::from_millis(50));

        let response = create_router(state)
            .oneshot(post_json("/", r#"{"action": "created"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        let body = body_json(response).await;
        assert_eq!(body["code"], "REQUEST_TIMEOUT");
    }

    #[tokio::test]
    async fn test_health_reports_adapter_counts() {
        let transport = Arc::new(RecordingTransport::new());

        let response = app(transport)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let body = body_json(response).await;
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["adapters"]["configured"], 3);
        assert_eq!(body["adapters"]["enabled"], 2);
    }
}
