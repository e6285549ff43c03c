//! Serve command handler
//!
//! Handles the serve command including dry-run validation and server startup.

use std::sync::Arc;

use crate::config::{Environment, Settings};
use crate::external::ReqwestTransport;
use crate::server::Server;
use crate::services::Dispatcher;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
    environment: Environment,
}

impl ServeCommandHandler {
    pub fn new(config: Settings, environment: Environment) -> Self {
        Self {
            config,
            environment,
        }
    }

    /// Run the hook receiver, or only validate when `dry_run` is set
    ///
    /// # Errors
    /// - Configuration validation errors
    /// - Server startup errors (if not dry-run)
    pub async fn execute(self, dry_run: bool) -> anyhow::Result<()> {
        if dry_run {
            return self.validate_only();
        }

        Server::new(self.config, self.environment).run().await
    }

    /// Validate configuration without starting the server
    pub fn validate_only(&self) -> anyhow::Result<()> {
        self.config.validate()?;

        let transport = Arc::new(ReqwestTransport::new(&self.config.http)?);
        let dispatcher = Dispatcher::from_configs(&self.config.services, transport);

        println!("✓ Configuration is valid ({})", self.environment);
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!(
            "✓ {} of {} services enabled",
            dispatcher.enabled_count(),
            dispatcher.adapters().len()
        );
        println!("Dry run completed successfully");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
