//! Command-line interface
//!
//! - Argument parsing with clap
//! - Configuration merging (CLI args + config files + environment)
//! - Command handlers for serve, migrate and token

pub mod config_merger;
pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use executor::execute_command;
pub use parser::{Cli, Commands, LogLevel};

use crate::config::{Environment, Settings};
use crate::logger::init_logger;

/// Load file/env configuration and apply CLI overrides.
///
/// # Errors
/// Returns error if configuration loading, merging, or validation fails
pub fn load_and_merge_config(cli: &Cli) -> anyhow::Result<(Settings, Environment)> {
    let merger = ConfigurationMerger::load(cli)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    let settings = merger
        .merge_cli_args(cli)
        .map_err(|e| anyhow::anyhow!("Configuration merge error: {}", e))?;

    Ok((settings, merger.environment()))
}

/// Install the global subscriber described by `settings.logger`.
pub fn init_logger_from_settings(settings: &Settings) -> anyhow::Result<()> {
    let logger_config = settings
        .logger
        .clone()
        .into_logger_config()
        .map_err(|e| anyhow::anyhow!("Logger configuration error: {}", e))?;

    init_logger(&logger_config).map_err(|e| anyhow::anyhow!("Logger initialization error: {}", e))
}
