//! Runtime configuration for the logger

use std::path::PathBuf;
use std::str::FromStr;

use tracing::Level;

use crate::logger::error::{LoggerError, Result};

/// Main logger configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub level: String,
    pub console: ConsoleConfig,
    pub file: FileConfig,
}

impl LoggerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.parse_level()?;
        self.file.validate()?;

        if !self.console.enabled && !self.file.enabled {
            return Err(LoggerError::config(
                "At least one output (console or file) must be enabled",
            ));
        }

        Ok(())
    }

    /// Parse the log level string into a tracing::Level
    pub fn parse_level(&self) -> Result<Level> {
        Level::from_str(&self.level).map_err(|_| {
            LoggerError::config(format!(
                "Invalid log level '{}'. Valid levels are: trace, debug, info, warn, error",
                self.level
            ))
        })
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: ConsoleConfig::default(),
            file: FileConfig::default(),
        }
    }
}

/// Console output configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub enabled: bool,
    /// Only honoured when stdout is a terminal.
    pub colored: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            colored: true,
        }
    }
}

/// File output configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileConfig {
    pub enabled: bool,
    pub path: PathBuf,
    pub append: bool,
    pub format: LogFormat,
    pub rotation: RotationConfig,
}

impl FileConfig {
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.path.as_os_str().is_empty() {
            return Err(LoggerError::config(
                "File path is required when file logging is enabled",
            ));
        }
        self.rotation.validate()
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from("logs/category-service.log"),
            append: true,
            format: LogFormat::default(),
            rotation: RotationConfig::default(),
        }
    }
}

/// Line format of the log file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Full,
    Compact,
    #[default]
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "full" => Ok(LogFormat::Full),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(LoggerError::config(format!(
                "Invalid log format '{}'. Valid formats are: full, compact, json",
                s
            ))),
        }
    }
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Full => "full",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        }
    }
}

/// Size-based rotation of the log file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationConfig {
    /// Bytes written to the live file before it is archived
    pub max_size: u64,
    /// Number of archives kept next to the live file
    pub max_files: usize,
    /// Gzip archives once rotated
    pub compress: bool,
}

impl RotationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(LoggerError::config("Rotation max_size must be greater than 0"));
        }
        if self.max_files == 0 {
            return Err(LoggerError::config("Rotation max_files must be greater than 0"));
        }
        Ok(())
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            max_size: 10 * 1024 * 1024,
            max_files: 5,
            compress: false,
        }
    }
}
