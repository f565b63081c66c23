//! Command executor for dispatching CLI commands

use super::handlers::{MigrateCommandHandler, ServeCommandHandler, TokenCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::{Environment, Settings};

/// Execute a parsed command with merged settings.
///
/// No subcommand means `serve`.
pub async fn execute_command(
    cli: &Cli,
    settings: Settings,
    environment: Environment,
) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings, environment)
                .execute(*dry_run)
                .await
        }
        None => {
            ServeCommandHandler::new(settings, environment)
                .execute(false)
                .await
        }
        Some(Commands::Migrate { dry_run, rollback }) => {
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await?;
            Ok(())
        }
        Some(Commands::Token { user_id, hours }) => {
            let token = TokenCommandHandler::new(settings).execute(*user_id, *hours)?;
            println!("{}", token);
            Ok(())
        }
    }
}
