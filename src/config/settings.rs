//! Configuration settings structures for category-service
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig, RotationConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "category-service".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/category-service.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_max_size() -> u64 {
    10 * 1024 * 1024 // 10MB
}

fn default_max_files() -> usize {
    5
}

fn default_access_token_expiration() -> i64 {
    1 // 1 hour
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// Axum HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// Get the full server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// ============================================================================
// Database Configuration
// ============================================================================

/// PostgreSQL connection pool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    #[serde(default)]
    pub url: String,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of idle connections kept open
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Seconds to wait for a connection before giving up
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,

    /// Run pending migrations before serving
    #[serde(default)]
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connection_timeout: default_connection_timeout(),
            auto_migrate: false,
        }
    }
}

// ============================================================================
// JWT Configuration
// ============================================================================

/// JWT authentication configuration
///
/// Tokens are issued by the user service; this service only verifies them
/// with the shared secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 secret shared with the issuer. Set it via `CATEGORY_JWT__SECRET`.
    #[serde(default)]
    pub secret: String,

    /// Lifetime in hours of tokens minted by the `token` command
    #[serde(default = "default_access_token_expiration")]
    pub access_token_expiration: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            access_token_expiration: default_access_token_expiration(),
        }
    }
}

// ============================================================================
// Logger Settings
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// Rotation settings for file logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationSettings {
    /// Maximum file size in bytes before rotation
    #[serde(default = "default_max_size")]
    pub max_size: u64,

    /// Maximum number of rotated files to keep
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    #[serde(default)]
    pub compress: bool,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
            max_files: default_max_files(),
            compress: false,
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: String,

    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,

    #[serde(default)]
    pub rotation: RotationSettings,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
            rotation: RotationSettings::default(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert the file representation into the runtime `LoggerConfig`.
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let format = self
            .file
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::validation("logger.file.format", e.to_string()))?;

        let config = LoggerConfig {
            level: self.level,
            console: ConsoleConfig {
                enabled: self.console.enabled,
                colored: self.console.colored,
            },
            file: FileConfig {
                enabled: self.file.enabled,
                path: PathBuf::from(self.file.path),
                append: self.file.append,
                format,
                rotation: RotationConfig {
                    max_size: self.file.rotation.max_size,
                    max_files: self.file.rotation.max_files,
                    compress: self.file.rotation.compress,
                },
            },
        };

        config
            .validate()
            .map_err(|e| ConfigError::validation("logger", e.to_string()))?;
        Ok(config)
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub jwt: JwtConfig,

    #[serde(default)]
    pub logger: LoggerSettings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_settings() -> impl Strategy<Value = Settings> {
        (
            "[a-z][a-z0-9-]{0,20}",
            1u16..=65535u16,
            1u32..=100u32,
            1u64..=120u64,
            prop_oneof![Just("trace"), Just("debug"), Just("info"), Just("warn")],
            prop_oneof![Just("full"), Just("compact"), Just("json")],
            any::<bool>(),
        )
            .prop_map(
                |(name, port, max_connections, connection_timeout, level, format, compress)| {
                    Settings {
                        application: ApplicationConfig {
                            name,
                            version: "1.0.0".to_string(),
                        },
                        server: ServerConfig {
                            port,
                            ..Default::default()
                        },
                        database: DatabaseConfig {
                            url: "postgres://localhost/categories".to_string(),
                            max_connections,
                            connection_timeout,
                            ..Default::default()
                        },
                        jwt: JwtConfig {
                            secret: "s".repeat(32),
                            access_token_expiration: 2,
                        },
                        logger: LoggerSettings {
                            level: level.to_string(),
                            file: FileSettings {
                                format: format.to_string(),
                                rotation: RotationSettings {
                                    compress,
                                    ..Default::default()
                                },
                                ..Default::default()
                            },
                            ..Default::default()
                        },
                    }
                },
            )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn settings_survive_toml(settings in arb_settings()) {
            let text = toml::to_string(&settings).unwrap();
            let parsed: Settings = toml::from_str(&text).unwrap();
            prop_assert_eq!(parsed, settings);
        }
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.application.name, "category-service");
        assert_eq!(settings.server.address(), "127.0.0.1:3000");
        assert_eq!(settings.database.max_connections, 10);
        assert!(!settings.database.auto_migrate);
        assert!(settings.jwt.secret.is_empty());
        assert_eq!(settings.jwt.access_token_expiration, 1);
        assert_eq!(settings.logger.file.rotation.max_files, 5);
    }

    #[test]
    fn test_deserialize_partial() {
        let settings: Settings = toml::from_str(
            r#"
[server]
port = 8080

[jwt]
secret = "a-secret-that-is-at-least-32-characters"
"#,
        )
        .unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.jwt.access_token_expiration, 1);
        assert_eq!(settings.logger.level, "info");
    }

    #[test]
    fn test_logger_settings_into_logger_config() {
        let settings = LoggerSettings {
            level: "debug".to_string(),
            file: FileSettings {
                enabled: true,
                path: "/tmp/category.log".to_string(),
                format: "compact".to_string(),
                rotation: RotationSettings {
                    max_size: 2048,
                    max_files: 3,
                    compress: true,
                },
                ..Default::default()
            },
            ..Default::default()
        };

        let config = settings.into_logger_config().unwrap();
        assert_eq!(config.level, "debug");
        assert_eq!(config.file.format, LogFormat::Compact);
        assert_eq!(config.file.path, PathBuf::from("/tmp/category.log"));
        assert_eq!(config.file.rotation.max_files, 3);
        assert!(config.file.rotation.compress);
    }

    #[test]
    fn test_logger_settings_invalid_format() {
        let settings = LoggerSettings {
            file: FileSettings {
                format: "xml".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = settings.into_logger_config().unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationError { field, .. } if field == "logger.file.format")
        );
    }

    #[test]
    fn test_logger_settings_both_outputs_disabled() {
        let settings = LoggerSettings {
            console: ConsoleSettings {
                enabled: false,
                colored: false,
            },
            ..Default::default()
        };
        assert!(settings.into_logger_config().is_err());
    }
}
