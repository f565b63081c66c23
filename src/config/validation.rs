//! Configuration validation logic
//!
//! Range and format checks run once after all layers are merged, so a bad
//! value fails start-up instead of the first request.

use crate::config::error::ConfigError;
use crate::config::settings::{
    DatabaseConfig, FileSettings, JwtConfig, LoggerSettings, ServerConfig, Settings,
};

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// HS256 keys shorter than the digest size weaken the signature.
const MIN_JWT_SECRET_LEN: usize = 32;

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::validation(
                "server.host",
                "Host is required. Use 127.0.0.1 for local access or 0.0.0.0 for all interfaces.",
            ));
        }

        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// # Validation Rules
    /// - URL must be a PostgreSQL connection string
    /// - Pool bounds must be positive with min <= max
    /// - Connection timeout must be positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::validation(
                "database.url",
                "Database URL is required. Set database.url or CATEGORY_DATABASE__URL.",
            ));
        }

        if !(self.url.starts_with("postgres://") || self.url.starts_with("postgresql://")) {
            return Err(ConfigError::validation(
                "database.url",
                "Invalid database URL format. Expected format: postgres://[user:password@]host[:port]/database",
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections == 0 {
            return Err(ConfigError::validation(
                "database.min_connections",
                "Min connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::validation(
                "database.min_connections",
                format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            ));
        }

        if self.connection_timeout == 0 {
            return Err(ConfigError::validation(
                "database.connection_timeout",
                "Connection timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl JwtConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::validation(
                "jwt.secret",
                "JWT secret cannot be empty. Set jwt.secret or CATEGORY_JWT__SECRET.",
            ));
        }

        if self.secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::validation(
                "jwt.secret",
                format!(
                    "JWT secret should be at least {} characters for security",
                    MIN_JWT_SECRET_LEN
                ),
            ));
        }

        if self.access_token_expiration <= 0 {
            return Err(ConfigError::validation(
                "jwt.access_token_expiration",
                "Access token expiration must be positive",
            ));
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        if self.rotation.max_size == 0 {
            return Err(ConfigError::validation(
                "logger.file.rotation.max_size",
                "Rotation size must be greater than 0 bytes.",
            ));
        }

        if self.rotation.max_files == 0 {
            return Err(ConfigError::validation(
                "logger.file.rotation.max_files",
                "At least one rotated file must be kept.",
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.file.validate()
    }
}

impl Settings {
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.jwt.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}
