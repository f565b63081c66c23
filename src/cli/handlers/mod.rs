//! Command handlers for CLI operations

pub mod migrate;
pub mod serve;
pub mod token;

pub use migrate::MigrateCommandHandler;
pub use serve::ServeCommandHandler;
pub use token::TokenCommandHandler;
