//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Forward issue tracker events to chat rooms and webhooks
#[derive(Parser, Debug)]
#[command(name = "lookout")]
#[command(about = "Forward issue tracker events to chat rooms and webhooks")]
#[command(long_about = "
lookout receives item events (created, updated, deleted) from an issue
tracker and forwards them to every configured destination: Flowdock,
HipChat, Slack and plain webhooks. Each destination decides on its own
which actions it reports.

EXAMPLES:
    # Start the hook receiver with default configuration
    lookout serve

    # Listen on every interface, port 8080
    lookout serve --host 0.0.0.0 --port 8080

    # Use a custom configuration file
    lookout --config /etc/lookout/lookout.toml serve

    # Dispatch one payload from a file
    lookout send --payload event.json

    # Dispatch a payload from stdin as a deletion
    cat event.json | lookout send --action deleted

    # Show configured destinations and whether they are enabled
    lookout check
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Load this TOML file instead of the `config/` directory layers.
    /// Environment variables still apply on top of it.
    ///
    /// Example: --config /etc/lookout/production.toml
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `config/{environment}.toml` layer is loaded,
    /// taking precedence over LOOKOUT_APP_ENV.
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the hook receiver (default)
    ///
    /// Accepts `POST /` and `POST /hooks` with a JSON payload and dispatches
    /// it to every configured destination.
    ///
    /// Examples:
    ///   lookout serve                           # Start with defaults
    ///   lookout serve --host 0.0.0.0 --port 80  # Bind to all interfaces on port 80
    ///   lookout serve --dry-run                 # Validate config without starting
    Serve {
        /// Host address to bind to
        ///
        /// Default: 127.0.0.1
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port number to listen on
        ///
        /// Default: 3000
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level override
        ///
        /// Takes precedence over the configuration file and --verbose/--quiet.
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Dispatch a single payload and print the report
    ///
    /// Reads a JSON object from --payload or stdin, sends it through every
    /// configured destination once and prints the per-destination result.
    /// Exits non-zero if any destination failed.
    Send {
        /// JSON payload file; stdin when omitted
        #[arg(long, value_name = "FILE", value_parser = super::validation::validate_payload_file_path)]
        payload: Option<PathBuf>,

        /// Override the payload's action
        #[arg(long, value_enum)]
        action: Option<ActionArg>,
    },
    /// Validate configuration and list destinations
    Check,
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

/// Log level options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

/// Payload actions accepted by `send --action`
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionArg {
    Created,
    Updated,
    Deleted,
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => "error".to_string(),
            LogLevel::Warn => "warn".to_string(),
            LogLevel::Info => "info".to_string(),
            LogLevel::Debug => "debug".to_string(),
            LogLevel::Trace => "trace".to_string(),
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}

impl From<ActionArg> for crate::models::Action {
    fn from(action: ActionArg) -> Self {
        match action {
            ActionArg::Created => crate::models::Action::Created,
            ActionArg::Updated => crate::models::Action::Updated,
            ActionArg::Deleted => crate::models::Action::Deleted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["lookout", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_default_behavior() {
        let cli = Cli::try_parse_from(["lookout"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(!cli.quiet);
        assert!(cli.config.is_none());
        assert!(cli.env.is_none());
    }

    #[test]
    fn test_serve_command() {
        let cli = Cli::try_parse_from(["lookout", "serve", "--host", "0.0.0.0", "--port", "8080"])
            .unwrap();
        match cli.command {
            Some(Commands::Serve {
                host,
                port,
                dry_run,
                ..
            }) => {
                assert_eq!(host, Some("0.0.0.0".to_string()));
                assert_eq!(port, Some(8080));
                assert!(!dry_run);
            }
            other => panic!("Expected Serve command, got {other:?}"),
        }
    }

    #[test]
    fn test_send_command_with_action() {
        let cli = Cli::try_parse_from(["lookout", "send", "--action", "deleted"]).unwrap();
        match cli.command {
            Some(Commands::Send { payload, action }) => {
                assert!(payload.is_none());
                assert_eq!(action, Some(ActionArg::Deleted));
            }
            other => panic!("Expected Send command, got {other:?}"),
        }
    }

    #[test]
    fn test_send_rejects_unknown_action() {
        let err = Cli::try_parse_from(["lookout", "send", "--action", "archived"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_check_command() {
        let cli = Cli::try_parse_from(["lookout", "--env", "prod", "check"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Check)));
        assert!(matches!(cli.env, Some(Environment::Production)));
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let err = Cli::try_parse_from(["lookout", "--verbose", "--quiet"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
