//! Fans a payload out to every configured adapter.
//!
//! Adapters run concurrently and independently: one adapter failing never
//! prevents or undoes delivery by another.

use super::adapter::{NotificationAdapter, SendOutcome, SkipReason};
use super::flowdock_adapter::FlowdockAdapter;
use super::hipchat_adapter::HipChatAdapter;
use super::slack_adapter::SlackAdapter;
use super::webhook_adapter::WebhookAdapter;
use crate::external::HttpTransport;
use crate::models::{Payload, ServiceConfig};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::Instrument;

/// Outcome of one adapter for one payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdapterResult {
    Delivered { requests: usize },
    Skipped { reason: SkipReason },
    Failed { error: String },
}

/// Per-adapter entry of a [`DispatchReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdapterReport {
    /// Position of the service in configuration
    pub index: usize,
    pub service: &'static str,
    #[serde(flatten)]
    pub result: AdapterResult,
}

/// Results for every adapter, in configuration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub results: Vec<AdapterReport>,
}

impl DispatchReport {
    pub fn delivered(&self) -> usize {
        self.count(|r| matches!(r, AdapterResult::Delivered { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|r| matches!(r, AdapterResult::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|r| matches!(r, AdapterResult::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    fn count(&self, predicate: impl Fn(&AdapterResult) -> bool) -> usize {
        self.results.iter().filter(|r| predicate(&r.result)).count()
    }
}

/// Builds the adapter for one service configuration
///
/// Factory method pattern - returns `Arc<dyn NotificationAdapter>` for
/// dynamic dispatch. Incomplete configurations produce disabled adapters.
pub fn create_adapter(
    config: &ServiceConfig,
    transport: Arc<dyn HttpTransport>,
) -> Arc<dyn NotificationAdapter> {
    match config {
        ServiceConfig::Flowdock(options) => Arc::new(FlowdockAdapter::configure(options, transport)),
        ServiceConfig::HipChat(options) => Arc::new(HipChatAdapter::configure(options, transport)),
        ServiceConfig::Slack(options) => Arc::new(SlackAdapter::configure(options, transport)),
        ServiceConfig::Webhook(options) => Arc::new(WebhookAdapter::configure(options, transport)),
    }
}

/// Dispatcher owning one adapter per configured service
#[derive(Clone)]
pub struct Dispatcher {
    adapters: Vec<Arc<dyn NotificationAdapter>>,
}

impl Dispatcher {
    pub fn new(adapters: Vec<Arc<dyn NotificationAdapter>>) -> Self {
        Self { adapters }
    }

    /// Builds every adapter from configuration, sharing one transport.
    pub fn from_configs(configs: &[ServiceConfig], transport: Arc<dyn HttpTransport>) -> Self {
        let adapters = configs
            .iter()
            .map(|config| create_adapter(config, transport.clone()))
            .collect::<Vec<_>>();

        for (index, adapter) in adapters.iter().enumerate() {
            if let Some(missing) = adapter.missing_option() {
                tracing::warn!(
                    index = index,
                    service = adapter.name(),
                    missing = missing,
                    "Service is missing required options and will be skipped"
                );
            }
        }

        Self::new(adapters)
    }

    pub fn adapters(&self) -> &[Arc<dyn NotificationAdapter>] {
        &self.adapters
    }

    pub fn enabled_count(&self) -> usize {
        self.adapters.iter().filter(|a| a.is_enabled()).count()
    }

    /// Sends `payload` through every adapter concurrently
    ///
    /// Never fails as a whole: adapter errors are logged and reported as
    /// [`AdapterResult::Failed`].
    pub async fn dispatch(&self, payload: &Payload) -> DispatchReport {
        let action = payload.action().unwrap_or("<none>").to_string();
        let span = tracing::info_span!("dispatch", action = %action, adapters = self.adapters.len());

        async {
            let sends = self.adapters.iter().enumerate().map(|(index, adapter)| async move {
                let result = match adapter.send(payload).await {
                    Ok(SendOutcome::Delivered { requests }) => AdapterResult::Delivered { requests },
                    Ok(SendOutcome::Skipped { reason }) => AdapterResult::Skipped { reason },
                    Err(e) => {
                        tracing::warn!(
                            index = index,
                            service = adapter.name(),
                            error = %e,
                            "Notification failed"
                        );
                        AdapterResult::Failed {
                            error: e.to_string(),
                        }
                    }
                };

                AdapterReport {
                    index,
                    service: adapter.name(),
                    result,
                }
            });

            let report = DispatchReport {
                results: join_all(sends).await,
            };

            tracing::info!(
                delivered = report.delivered(),
                skipped = report.skipped(),
                failed = report.failed(),
                "Dispatch finished"
            );
            report
        }
        .instrument(span)
        .await
    }
}
