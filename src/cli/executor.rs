//! Command executor for dispatching CLI commands
//!
//! Runs the selected command with merged, validated settings.

use std::process::ExitCode;

use super::handlers::{CheckCommandHandler, SendCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::api::dto::DispatchResponse;
use crate::config::{Environment, Settings};

/// Execute a CLI command with the given settings
///
/// No subcommand means `serve`. `send` exits with failure when any adapter
/// failed to deliver.
///
/// # Errors
/// Returns errors from command handlers
pub async fn execute_command(
    cli: &Cli,
    settings: Settings,
    environment: Environment,
) -> anyhow::Result<ExitCode> {
    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings, environment)
                .execute(*dry_run)
                .await?;
        }
        None => {
            ServeCommandHandler::new(settings, environment)
                .execute(false)
                .await?;
        }
        Some(Commands::Send { payload, action }) => {
            let handler = SendCommandHandler::new(&settings)?;
            let input = SendCommandHandler::read_input(payload.as_deref())?;
            let payload = SendCommandHandler::parse_payload(&input, action.map(Into::into))?;

            let report = handler.execute(&payload).await;
            let failed = report.has_failures();
            println!(
                "{}",
                serde_json::to_string_pretty(&DispatchResponse::from(report))?
            );

            if failed {
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Commands::Check) => {
            CheckCommandHandler::new(settings, environment).execute()?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
