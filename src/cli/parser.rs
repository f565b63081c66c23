//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Income and expense categories service
#[derive(Parser, Debug)]
#[command(name = "category-service")]
#[command(about = "Income and expense categories service")]
#[command(long_about = "
category-service stores the income and expense categories of a personal
finance application and serves them over a JWT-protected REST API.

EXAMPLES:
    # Start the server with default configuration
    category-service serve

    # Start server on custom host and port
    category-service serve --host 0.0.0.0 --port 8080

    # Use a single configuration file
    category-service --config /etc/category-service/production.toml serve

    # Check configuration without starting server
    category-service serve --dry-run

    # Apply pending migrations, or preview them
    category-service migrate
    category-service migrate --dry-run

    # Mint an access token for user 42 to try the API locally
    category-service token --user-id 42
")]
#[command(version = crate::build::CLAP_LONG_VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Load this single TOML file instead of the layered `config/` directory.
    /// `CATEGORY_*` environment variables still override it.
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `{environment}.toml` layer is loaded. Takes precedence
    /// over `CATEGORY_APP_ENV`.
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server (default)
    ///
    /// Examples:
    ///   category-service serve                           # Start with defaults
    ///   category-service serve --host 0.0.0.0 --port 80 # Bind to all interfaces on port 80
    ///   category-service serve --dry-run                 # Validate config without starting
    Serve {
        /// Host address to bind to
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port number to listen on
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
    /// Database migration operations
    ///
    /// Examples:
    ///   category-service migrate                # Apply all pending migrations
    ///   category-service migrate --dry-run      # Show pending migrations without applying
    ///   category-service migrate --rollback 1   # Revert the last migration
    Migrate {
        /// Show pending migrations without applying
        #[arg(long, conflicts_with = "rollback")]
        dry_run: bool,

        /// Number of migrations to rollback (1-100)
        #[arg(long, value_name = "STEPS", conflicts_with = "dry_run", value_parser = super::validation::validate_rollback_steps)]
        rollback: Option<u32>,
    },
    /// Print a signed access token for local testing
    ///
    /// The token is signed with `jwt.secret`, so the running service accepts it.
    Token {
        /// Subject of the token
        #[arg(long, value_name = "ID", value_parser = super::validation::validate_user_id)]
        user_id: i64,

        /// Lifetime in hours; defaults to `jwt.access_token_expiration`
        #[arg(long, value_name = "HOURS", value_parser = super::validation::validate_token_hours)]
        hours: Option<i64>,
    },
}

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

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
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
