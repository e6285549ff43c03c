//! Check command handler
//!
//! Validates configuration and lists every configured service. Services with
//! missing options are reported as warnings, not failures: they load fine and
//! are skipped at dispatch time.

use std::sync::Arc;

use serde::Serialize;

use crate::config::{Environment, Settings};
use crate::external::{HttpTransport, ReqwestTransport};
use crate::services::Dispatcher;

/// One line of the check report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    pub index: usize,
    pub service: &'static str,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<&'static str>,
}

/// Handler for the check command
pub struct CheckCommandHandler {
    config: Settings,
    environment: Environment,
}

impl CheckCommandHandler {
    pub fn new(config: Settings, environment: Environment) -> Self {
        Self {
            config,
            environment,
        }
    }

    /// Builds the status of every configured service without sending anything.
    pub fn statuses(&self, transport: Arc<dyn HttpTransport>) -> Vec<ServiceStatus> {
        let dispatcher = Dispatcher::from_configs(&self.config.services, transport);
        dispatcher
            .adapters()
            .iter()
            .enumerate()
            .map(|(index, adapter)| ServiceStatus {
                index,
                service: adapter.name(),
                enabled: adapter.is_enabled(),
                missing: adapter.missing_option(),
            })
            .collect()
    }

    pub fn execute(&self) -> anyhow::Result<()> {
        self.config.validate()?;
        let transport = Arc::new(ReqwestTransport::new(&self.config.http)?);
        let statuses = self.statuses(transport);

        println!("✓ Configuration is valid ({})", self.environment);
        if statuses.is_empty() {
            println!("⚠ No services configured; events will be accepted and dropped");
        }
        for status in &statuses {
            match status.missing {
                None => println!("✓ [{}] {} enabled", status.index, status.service),
                Some(missing) => println!(
                    "⚠ [{}] {} disabled: missing `{}`",
                    status.index, status.service, missing
                ),
            }
        }

        let enabled = statuses.iter().filter(|s| s.enabled).count();
        println!("{} of {} services enabled", enabled, statuses.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::testing::RecordingTransport;
    use crate::models::{FlowdockOptions, HipChatOptions, ServiceConfig, WebhookOptions};

    fn handler() -> CheckCommandHandler {
        let config = Settings {
            services: vec![
                ServiceConfig::Flowdock(FlowdockOptions {
                    auth_token: Some("token".to_string()),
                    ..Default::default()
                }),
                ServiceConfig::HipChat(HipChatOptions {
                    auth_token: Some("token".to_string()),
                    ..Default::default()
                }),
                ServiceConfig::Webhook(WebhookOptions::default()),
            ],
            ..Default::default()
        };
        CheckCommandHandler::new(config, Environment::Test)
    }

    #[test]
    fn test_statuses_report_missing_options() {
        let transport = Arc::new(RecordingTransport::new());
        let statuses = handler().statuses(transport.clone());

        assert_eq!(statuses.len(), 3);
        assert!(statuses[0].enabled);
        assert_eq!(statuses[1].missing, Some("room_id"));
        assert_eq!(statuses[2].missing, Some("urls"));
        assert_eq!(transport.call_count(), 0);
    }

    #[test]
    fn test_execute_succeeds_with_disabled_services() {
        assert!(handler().execute().is_ok());
    }

    #[test]
    fn test_execute_fails_on_invalid_config() {
        let mut config = Settings::default();
        config.http.timeout_seconds = 0;
        let handler = CheckCommandHandler::new(config, Environment::Test);
        assert!(handler.execute().is_err());
    }
}
