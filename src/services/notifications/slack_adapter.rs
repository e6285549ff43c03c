//! Slack notification adapter implementation.
//!
//! Posts to a Slack incoming-webhook URL. The URL is used exactly as
//! configured. Without `notify_on_actions` only `created` events are sent.

use super::action_policy::ActionPolicy;
use super::adapter::{
    AdapterState, NotificationAdapter, SendOutcome, admit, required, submit, verbatim,
};
use crate::error::AppResult;
use crate::external::{HttpTransport, OutboundRequest};
use crate::models::{EventSummary, Payload, SlackOptions};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
struct SlackTarget {
    url: String,
    channel: Option<String>,
    username: Option<String>,
}

/// Slack incoming-webhook adapter
pub struct SlackAdapter {
    state: AdapterState<SlackTarget>,
    policy: ActionPolicy,
    transport: Arc<dyn HttpTransport>,
}

impl SlackAdapter {
    pub fn configure(options: &SlackOptions, transport: Arc<dyn HttpTransport>) -> Self {
        let state = match verbatim(&options.url) {
            Some(url) => AdapterState::Configured(SlackTarget {
                url,
                channel: required(&options.channel),
                username: required(&options.username),
            }),
            None => AdapterState::Disabled { missing: "url" },
        };

        Self {
            state,
            policy: ActionPolicy::from_allow_list(options.notify_on_actions.as_deref()),
            transport,
        }
    }

    /// Action filter in effect for this adapter.
    pub fn policy(&self) -> &ActionPolicy {
        &self.policy
    }

    fn build_body(&self, target: &SlackTarget, payload: &Payload) -> Value {
        let summary = payload.summary();
        let action = payload
            .action()
            .unwrap_or(self.policy.default_action().as_str());

        let mut body = json!({
            "text": Self::text(&summary, action),
            "attachments": [Self::attachment(&summary, action)],
        });

        if let Some(channel) = &target.channel {
            body["channel"] = json!(channel);
        }
        if let Some(username) = &target.username {
            body["username"] = json!(username);
        }

        body
    }

    fn text(summary: &EventSummary, action: &str) -> String {
        let label = match &summary.url {
            Some(url) => format!("<{}|{}>", escape_slack(url), escape_slack(&summary.label())),
            None => escape_slack(&summary.label()),
        };

        let mut text = format!("{} {}", label, escape_slack(action));
        if let Some(author) = summary.author_name() {
            text.push_str(&format!(" by {}", escape_slack(&author)));
        }
        if let Some(product) = &summary.product {
            text.push_str(&format!(" in {}", escape_slack(product)));
        }
        text
    }

    fn attachment(summary: &EventSummary, action: &str) -> Value {
        let fallback = summary.headline(action);
        let mut attachment = json!({
            "fallback": escape_slack(&fallback),
            "color": color_for(action),
        });

        if let Some(title) = &summary.title {
            attachment["title"] = json!(escape_slack(title));
            if let Some(url) = &summary.url {
                attachment["title_link"] = json!(url);
            }
        }
        if let Some(description) = &summary.description {
            attachment["text"] = json!(escape_slack(description));
        }

        attachment
    }
}

fn color_for(action: &str) -> &'static str {
    match action {
        "created" => "good",
        "deleted" => "danger",
        _ => "warning",
    }
}

/// Escapes the three characters Slack treats as control sequences.
fn escape_slack(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[async_trait]
impl NotificationAdapter for SlackAdapter {
    async fn send(&self, payload: &Payload) -> AppResult<SendOutcome> {
        let target = match admit(self.name(), &self.state, &self.policy, payload) {
            Ok(target) => target,
            Err(skipped) => return Ok(skipped),
        };

        let request = OutboundRequest::post(&target.url).json(self.build_body(target, payload));
        submit(self.transport.as_ref(), self.name(), &request).await?;

        Ok(SendOutcome::Delivered { requests: 1 })
    }

    fn name(&self) -> &'static str {
        "slack"
    }

    fn missing_option(&self) -> Option<&'static str> {
        self.state.missing()
    }
}
