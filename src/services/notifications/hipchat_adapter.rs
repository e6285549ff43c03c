//! HipChat notification adapter implementation.
//!
//! Sends room notifications through the HipChat v2 API. Like Flowdock, only
//! `created` events are forwarded.

use super::action_policy::ActionPolicy;
use super::adapter::{AdapterState, NotificationAdapter, SendOutcome, admit, required, submit};
use crate::error::{AppError, AppResult};
use crate::external::{HttpTransport, OutboundRequest};
use crate::models::{HipChatOptions, Payload, escape_html};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::{Value, json};
use std::sync::Arc;

const API_ROOM_URL: &str = "https://api.hipchat.com/v2/room";
const DEFAULT_COLOR: &str = "yellow";
const VALID_COLORS: &[&str] = &["yellow", "green", "red", "purple", "gray", "random"];

#[derive(Debug, Clone, PartialEq, Eq)]
struct HipChatTarget {
    auth_token: String,
    room_id: String,
    from: Option<String>,
    color: String,
    notify: bool,
}

/// HipChat room notification adapter
pub struct HipChatAdapter {
    state: AdapterState<HipChatTarget>,
    policy: ActionPolicy,
    transport: Arc<dyn HttpTransport>,
}

impl HipChatAdapter {
    /// Creates the adapter; both `auth_token` and `room_id` are required.
    pub fn configure(options: &HipChatOptions, transport: Arc<dyn HttpTransport>) -> Self {
        let state = match (required(&options.auth_token), required(&options.room_id)) {
            (Some(auth_token), Some(room_id)) => AdapterState::Configured(HipChatTarget {
                auth_token,
                room_id,
                from: required(&options.from),
                color: required(&options.color)
                    .map(|color| color.to_lowercase())
                    .filter(|color| VALID_COLORS.contains(&color.as_str()))
                    .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
                notify: options.notify.unwrap_or(true),
            }),
            (None, _) => AdapterState::Disabled {
                missing: "auth_token",
            },
            (_, None) => AdapterState::Disabled { missing: "room_id" },
        };

        Self {
            state,
            policy: ActionPolicy::created_only(),
            transport,
        }
    }

    fn build_request(target: &HipChatTarget, payload: &Payload) -> AppResult<OutboundRequest> {
        let mut url = Url::parse(API_ROOM_URL).map_err(anyhow::Error::from)?;
        url.path_segments_mut()
            .map_err(|_| AppError::Internal {
                source: anyhow::anyhow!("HipChat room URL cannot take path segments"),
            })?
            .push(&target.room_id)
            .push("notification");
        url.query_pairs_mut()
            .append_pair("auth_token", &target.auth_token);

        Ok(OutboundRequest::post(url.as_str()).json(Self::build_body(target, payload)))
    }

    fn build_body(target: &HipChatTarget, payload: &Payload) -> Value {
        let summary = payload.summary();
        let action = payload.action().unwrap_or("created");

        let mut message = format!("<strong>{}</strong> {}", escape_html(&summary.label()), action);
        if let Some(author) = summary.author_name() {
            message.push_str(&format!(" by {}", escape_html(&author)));
        }
        match (&summary.title, &summary.url) {
            (Some(title), Some(url)) => message.push_str(&format!(
                ": <a href=\"{}\">{}</a>",
                escape_html(url),
                escape_html(title)
            )),
            (Some(title), None) => message.push_str(&format!(": {}", escape_html(title))),
            (None, Some(url)) => message.push_str(&format!(
                ": <a href=\"{}\">{}</a>",
                escape_html(url),
                escape_html(url)
            )),
            (None, None) => {}
        }
        if let Some(product) = &summary.product {
            message.push_str(&format!(" ({})", escape_html(product)));
        }

        let mut body = json!({
            "message": message,
            "message_format": "html",
            "color": target.color,
            "notify": target.notify,
        });

        if let Some(from) = &target.from {
            body["from"] = json!(from);
        }

        body
    }
}

#[async_trait]
impl NotificationAdapter for HipChatAdapter {
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
        "hipchat"
    }

    fn missing_option(&self) -> Option<&'static str> {
        self.state.missing()
    }
}
