//! Flowdock notification adapter implementation.
//!
//! Posts new items to a flow's team inbox through the Flowdock push API.
//! The team inbox only models newly created items, so every other action is
//! skipped.
//!
//! API reference: https://www.flowdock.com/api/team-inbox

use super::action_policy::ActionPolicy;
use super::adapter::{AdapterState, NotificationAdapter, SendOutcome, admit, required, submit};
use crate::error::{AppError, AppResult};
use crate::external::{HttpTransport, OutboundRequest};
use crate::models::{FlowdockOptions, Payload, escape_html};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::{Value, json};
use std::sync::Arc;

const TEAM_INBOX_URL: &str = "https://api.flowdock.com/v1/messages/team_inbox";
const DEFAULT_SOURCE: &str = "Lookout";
const DEFAULT_FROM_ADDRESS: &str = "lookout@localhost";

#[derive(Debug, Clone, PartialEq, Eq)]
struct FlowdockTarget {
    auth_token: String,
    source: String,
    from_address: String,
}

/// Flowdock team inbox adapter
pub struct FlowdockAdapter {
    state: AdapterState<FlowdockTarget>,
    policy: ActionPolicy,
    transport: Arc<dyn HttpTransport>,
}

impl FlowdockAdapter {
    /// Creates the adapter; a missing `auth_token` leaves it disabled.
    pub fn configure(options: &FlowdockOptions, transport: Arc<dyn HttpTransport>) -> Self {
        let state = match required(&options.auth_token) {
            Some(auth_token) => AdapterState::Configured(FlowdockTarget {
                auth_token,
                source: required(&options.source).unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
                from_address: required(&options.from_address)
                    .unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
            }),
            None => AdapterState::Disabled {
                missing: "auth_token",
            },
        };

        Self {
            state,
            policy: ActionPolicy::created_only(),
            transport,
        }
    }

    /// Builds the team inbox request for `payload`.
    fn build_request(target: &FlowdockTarget, payload: &Payload) -> AppResult<OutboundRequest> {
        let mut url = Url::parse(TEAM_INBOX_URL).map_err(anyhow::Error::from)?;
        url.path_segments_mut()
            .map_err(|_| AppError::Internal {
                source: anyhow::anyhow!("Flowdock inbox URL cannot take path segments"),
            })?
            .push(&target.auth_token);

        Ok(OutboundRequest::post(url.as_str()).json(Self::build_body(target, payload)))
    }

    fn build_body(target: &FlowdockTarget, payload: &Payload) -> Value {
        let summary = payload.summary();
        let action = payload.action().unwrap_or("created");

        let mut content = summary
            .description
            .as_deref()
            .or(summary.title.as_deref())
            .map(escape_html)
            .unwrap_or_default();
        if let Some(url) = &summary.url {
            content.push_str(&format!(
                "<p><a href=\"{}\">{}</a></p>",
                escape_html(url),
                escape_html(url)
            ));
        }
        if content.is_empty() {
            content = escape_html(&summary.headline(action));
        }

        let from_address = summary
            .author
            .as_ref()
            .and_then(|author| author.email.clone())
            .unwrap_or_else(|| target.from_address.clone());

        let mut tags = vec![action.to_string()];
        if let Some(item_type) = &summary.item_type {
            tags.push(item_type.to_lowercase());
        }

        let mut body = json!({
            "source": target.source,
            "from_address": from_address,
            "subject": summary.headline(action),
            "content": content,
            "tags": tags,
        });

        if let Some(name) = summary.author_name() {
            body["from_name"] = json!(name);
        }

        if let Some(url) = &summary.url {
            body["link"] = json!(url);
        }

        body
    }
}

#[async_trait]
impl NotificationAdapter for FlowdockAdapter {
    async fn send(&self, payload: &Payload) -> AppResult<SendOutcome> {
        let target = match admit(self.name(), &self.state, &self.policy, payload) {
            Ok(target) => target,
            Err(skipped) => return Ok(skipped),
        };

        let request = Self::build_request(target, payload)?;
        submit(self.transport.as_ref(), self.name(), &request).await?;

        Ok(SendOutcome::Delivered { requests: 1 })
    }

    fn name(&self) -> &'static str {
        "flowdock"
    }

    fn missing_option(&self) -> Option<&'static str> {
        self.state.missing()
    }
}
