//! Send command handler
//!
//! Dispatches one payload read from a file or stdin, exactly as the hook
//! receiver would.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::config::Settings;
use crate::error::AppResult;
use crate::external::{HttpTransport, ReqwestTransport};
use crate::models::{Action, Payload};
use crate::services::{DispatchReport, Dispatcher};

/// Handler for the send command
pub struct SendCommandHandler {
    dispatcher: Dispatcher,
}

impl SendCommandHandler {
    pub fn new(config: &Settings) -> anyhow::Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(&config.http)?);
        Ok(Self::with_transport(config, transport))
    }

    pub fn with_transport(config: &Settings, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            dispatcher: Dispatcher::from_configs(&config.services, transport),
        }
    }

    /// Reads raw payload text from `path`, or from stdin when `None`.
    pub fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
        match path {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read payload file '{}'", path.display())),
            None => {
                let mut input = String::new();
                std::io::stdin()
                    .read_to_string(&mut input)
                    .context("Failed to read payload from stdin")?;
                Ok(input)
            }
        }
    }

    /// Parses payload text, applying the `--action` override if any.
    pub fn parse_payload(input: &str, action: Option<Action>) -> AppResult<Payload> {
        let value: serde_json::Value = serde_json::from_str(input)?;
        let payload = Payload::from_value(value)?;
        Ok(match action {
            Some(action) => payload.with_action(action),
            None => payload,
        })
    }

    pub async fn execute(&self, payload: &Payload) -> DispatchReport {
        self.dispatcher.dispatch(payload).await
    }
}
