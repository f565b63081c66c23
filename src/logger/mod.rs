//! Logger Module
//!
//! Installs a `tracing-subscriber` registry with:
//! - Console output with color control
//! - File output in Full, Compact or JSON format
//! - Size-based rotation of the log file with optional gzip of archives

pub mod compression;
pub mod config;
pub mod error;
pub mod rotation;
pub(crate) mod writer;

pub use config::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig, RotationConfig};
pub use error::LoggerError;

use std::io::IsTerminal;

use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};
use writer::RotatingFileWriter;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize the global subscriber with the given configuration
///
/// `RUST_LOG` is ignored; the level comes from configuration only.
pub fn init_logger(config: &LoggerConfig) -> Result<(), LoggerError> {
    config.validate()?;

    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| LoggerError::config(format!("Invalid log filter: {}", e)))?;

    // File layer goes first: the first layer's ANSI setting leaks into span
    // fields of every later layer (tokio-rs/tracing#1817).
    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);
    if config.file.enabled {
        layers.push(file_layer(&config.file)?);
    }
    if config.console.enabled {
        layers.push(console_layer(&config.console));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()?;

    Ok(())
}

fn console_layer(config: &ConsoleConfig) -> BoxedLayer {
    let use_ansi = config.colored && std::io::stdout().is_terminal();

    fmt::layer()
        .with_ansi(use_ansi)
        .with_target(true)
        .with_level(true)
        .boxed()
}

fn file_layer(config: &FileConfig) -> Result<BoxedLayer, LoggerError> {
    let writer = RotatingFileWriter::new(config)?;
    let layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer);

    Ok(match config.format {
        LogFormat::Full => layer.boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_layer_builds_for_every_format() {
        let dir = tempdir().unwrap();
        for format in [LogFormat::Full, LogFormat::Compact, LogFormat::Json] {
            let config = FileConfig {
                enabled: true,
                path: dir.path().join(format!("{}.log", format.as_str())),
                format,
                ..Default::default()
            };
            assert!(file_layer(&config).is_ok());
        }
    }

    #[test]
    fn test_init_rejects_invalid_config() {
        let config = LoggerConfig {
            level: "loud".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            init_logger(&config),
            Err(LoggerError::Config { .. })
        ));
    }
}
