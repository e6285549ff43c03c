//! Notification dispatch with pluggable adapters.
//!
//! The core trait [`NotificationAdapter`] is implemented once per destination.
//! [`Dispatcher`] builds one adapter per configured service and fans each
//! payload out to all of them.

mod action_policy;
mod adapter;
mod dispatcher;
mod flowdock_adapter;
mod hipchat_adapter;
mod slack_adapter;
mod webhook_adapter;

pub use action_policy::{ActionFilter, ActionPolicy};
pub use adapter::{NotificationAdapter, SendOutcome, SkipReason};
pub use dispatcher::{AdapterReport, AdapterResult, DispatchReport, Dispatcher, create_adapter};
pub use flowdock_adapter::FlowdockAdapter;
pub use hipchat_adapter::HipChatAdapter;
pub use slack_adapter::SlackAdapter;
pub use webhook_adapter::WebhookAdapter;
