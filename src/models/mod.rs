//! Domain models: event payloads and service configuration.

mod payload;
mod service;

pub use payload::{Action, Author, EventSummary, Payload, escape_html};
pub use service::{FlowdockOptions, HipChatOptions, ServiceConfig, SlackOptions, WebhookOptions};
