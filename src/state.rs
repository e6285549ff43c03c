//! Application state for Axum web framework.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{ApplicationConfig, Settings};
use crate::external::HttpTransport;
use crate::services::Dispatcher;

/// Shared state handed to every request handler.
///
/// Cloning is cheap: the dispatcher sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub application: ApplicationConfig,
    /// Upper bound for handling one inbound request, dispatch included
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, application: ApplicationConfig) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            application,
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Builds the dispatcher for every configured service over `transport`.
    pub fn from_settings(settings: &Settings, transport: Arc<dyn HttpTransport>) -> Self {
        let dispatcher = Dispatcher::from_configs(&settings.services, transport);
        Self::new(dispatcher, settings.application.clone())
            .with_request_timeout(Duration::from_secs(settings.server.request_timeout))
    }
}
