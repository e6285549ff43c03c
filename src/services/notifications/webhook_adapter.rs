//! Generic webhook adapter implementation.
//!
//! Forwards the payload JSON unchanged to every configured URL, whatever its
//! action.

use super::action_policy::ActionPolicy;
use super::adapter::{AdapterState, NotificationAdapter, SendOutcome, admit, submit};
use crate::error::AppResult;
use crate::external::{HttpTransport, OutboundRequest};
use crate::models::{Payload, WebhookOptions};
use async_trait::async_trait;
use std::sync::Arc;

/// Webhook adapter posting to a list of URLs
pub struct WebhookAdapter {
    state: AdapterState<Vec<String>>,
    policy: ActionPolicy,
    transport: Arc<dyn HttpTransport>,
}

impl WebhookAdapter {
    /// Creates the adapter; an absent or empty `urls` list leaves it disabled.
    ///
    /// Entries are posted to exactly as configured, one request each.
    pub fn configure(options: &WebhookOptions, transport: Arc<dyn HttpTransport>) -> Self {
        let state = match options.urls.as_deref() {
            Some(urls) if !urls.is_empty() => AdapterState::Configured(urls.to_vec()),
            _ => AdapterState::Disabled { missing: "urls" },
        };

        Self {
            state,
            policy: ActionPolicy::any(),
            transport,
        }
    }

    /// Target URLs in delivery order; empty when disabled.
    pub fn urls(&self) -> &[String] {
        self.state.target().map(Vec::as_slice).unwrap_or_default()
    }
}

#[async_trait]
impl NotificationAdapter for WebhookAdapter {
    /// Posts to each URL in order. A failing URL does not stop the remaining
    /// ones; the first error is returned once all have been tried.
    async fn send(&self, payload: &Payload) -> AppResult<SendOutcome> {
        let urls = match admit(self.name(), &self.state, &self.policy, payload) {
            Ok(urls) => urls,
            Err(skipped) => return Ok(skipped),
        };

        let body = payload.to_value();
        let mut first_error = None;

        for url in urls {
            let request = OutboundRequest::post(url).json(body.clone());
            if let Err(e) = submit(self.transport.as_ref(), self.name(), &request).await {
                tracing::warn!(service = self.name(), error = %e, "Webhook delivery failed");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(SendOutcome::Delivered {
                requests: urls.len(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "webhook"
    }

    fn missing_option(&self) -> Option<&'static str> {
        self.state.missing()
    }
}
