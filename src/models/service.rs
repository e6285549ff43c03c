//! Service configuration models.
//!
//! Every option is optional at the type level: a section with missing fields
//! still deserializes and simply yields a disabled adapter.

use serde::{Deserialize, Serialize};

/// Flowdock team inbox options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowdockOptions {
    /// Flow API token (required)
    pub auth_token: Option<String>,
    /// Human readable source application name
    pub source: Option<String>,
    /// Sender address used when the payload carries no author email
    pub from_address: Option<String>,
}

/// HipChat room notification options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HipChatOptions {
    /// Room notification token (required)
    pub auth_token: Option<String>,
    /// Room id or name (required)
    pub room_id: Option<String>,
    /// Label shown next to the message
    pub from: Option<String>,
    /// Background color: yellow, green, red, purple, gray or random
    pub color: Option<String>,
    /// Whether the message triggers a user notification
    pub notify: Option<bool>,
}

/// Slack incoming webhook options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackOptions {
    /// Incoming webhook URL (required)
    pub url: Option<String>,
    /// Action names that trigger a message; only `created` when unset
    pub notify_on_actions: Option<Vec<String>>,
    /// Channel override
    pub channel: Option<String>,
    /// Username override
    pub username: Option<String>,
}

/// Generic webhook options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookOptions {
    /// Target URLs, posted to in order (required)
    pub urls: Option<Vec<String>>,
}

/// One configured destination
///
/// In TOML:
/// ```toml
/// [[services]]
/// type = "slack"
/// url = "https://hooks.slack.com/services/T000/B000/XXXX"
/// notify_on_actions = ["created", "deleted"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServiceConfig {
    Flowdock(FlowdockOptions),
    #[serde(rename = "hipchat")]
    HipChat(HipChatOptions),
    Slack(SlackOptions),
    Webhook(WebhookOptions),
}

impl ServiceConfig {
    /// Service type name as written in configuration
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceConfig::Flowdock(_) => "flowdock",
            ServiceConfig::HipChat(_) => "hipchat",
            ServiceConfig::Slack(_) => "slack",
            ServiceConfig::Webhook(_) => "webhook",
        }
    }

    /// Every URL this service would post to, for validation
    pub fn configured_urls(&self) -> Vec<&str> {
        match self {
            ServiceConfig::Slack(options) => options.url.as_deref().into_iter().collect(),
            ServiceConfig::Webhook(options) => options
                .urls
                .iter()
                .flatten()
                .map(String::as_str)
                .collect(),
            ServiceConfig::Flowdock(_) | ServiceConfig::HipChat(_) => Vec::new(),
        }
    }
}
