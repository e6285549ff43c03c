//! Configuration merger for CLI arguments and config files
//!
//! CLI arguments override file-based configuration; file-based configuration
//! overrides built-in defaults.

use std::path::Path;

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Environment, Settings};

/// Merges CLI overrides into loaded configuration
pub struct ConfigurationMerger {
    base_config: Settings,
    environment: Environment,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings, environment: Environment) -> Self {
        Self {
            base_config,
            environment,
        }
    }

    /// Load configuration for the given CLI invocation
    ///
    /// `--config` replaces the layered directory with a single file, and
    /// `--env` replaces `LOOKOUT_APP_ENV`.
    ///
    /// # Errors
    /// Returns ConfigError if configuration loading or validation fails
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        Self::load(cli.config.as_deref(), cli.env.map(Into::into))
    }

    pub fn load(
        config_path: Option<&Path>,
        environment: Option<Environment>,
    ) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?;
        if let Some(path) = config_path {
            loader = loader.with_config_file(path);
        }
        if let Some(environment) = environment {
            loader = loader.with_environment(environment);
        }

        let config = loader.load()?;
        Ok(Self::new(config, loader.environment()))
    }

    /// Apply CLI overrides and validate the result
    ///
    /// Command-specific flags win over global ones: `serve --log-level`
    /// beats `--verbose`/`--quiet`.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            ..
        }) = &cli.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            if let Some(level) = log_level {
                config.logger.level = (*level).into();
            }
        }

        config.validate()?;

        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ServiceConfig, WebhookOptions};
    use clap::Parser;

    fn merger() -> ConfigurationMerger {
        let config = Settings {
            services: vec![ServiceConfig::Webhook(WebhookOptions {
                urls: Some(vec!["http://sprint.ly".to_string()]),
            })],
            ..Default::default()
        };
        ConfigurationMerger::new(config, Environment::Test)
    }

    #[test]
    fn test_no_overrides_keeps_base() {
        let cli = Cli::try_parse_from(["lookout"]).unwrap();
        let merged = merger().merge_cli_args(&cli).unwrap();
        assert_eq!(&merged, merger().config());
    }

    #[test]
    fn test_verbose_and_quiet_set_level() {
        let cli = Cli::try_parse_from(["lookout", "--verbose"]).unwrap();
        assert_eq!(merger().merge_cli_args(&cli).unwrap().logger.level, "debug");

        let cli = Cli::try_parse_from(["lookout", "--quiet", "check"]).unwrap();
        assert_eq!(merger().merge_cli_args(&cli).unwrap().logger.level, "error");
    }

    #[test]
    fn test_serve_overrides_server_and_level() {
        let cli = Cli::try_parse_from([
            "lookout",
            "--quiet",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--log-level",
            "trace",
        ])
        .unwrap();

        let merged = merger().merge_cli_args(&cli).unwrap();
        assert_eq!(merged.server.host, "0.0.0.0");
        assert_eq!(merged.server.port, 8080);
        assert_eq!(merged.logger.level, "trace");
        assert_eq!(merged.services, merger().config().services);
    }

    #[test]
    fn test_merge_revalidates() {
        let mut config = Settings::default();
        config.server.request_timeout = 0;
        let merger = ConfigurationMerger::new(config, Environment::Development);

        let cli = Cli::try_parse_from(["lookout", "serve"]).unwrap();
        let err = merger.merge_cli_args(&cli).unwrap_err();
        assert_eq!(err.field(), Some("server.request_timeout"));
    }
}
