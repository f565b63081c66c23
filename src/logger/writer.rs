//! Rotating file writer plugged into `tracing_subscriber::fmt`.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

use crate::logger::config::FileConfig;
use crate::logger::error::Result;
use crate::logger::rotation::RotationManager;

/// Shared handle to the live log file. Once the file becomes unwritable every
/// later line goes to stderr instead.
#[derive(Clone)]
pub struct RotatingFileWriter {
    state: Arc<Mutex<WriterState>>,
    path: PathBuf,
}

struct WriterState {
    file: BufWriter<File>,
    current_size: u64,
    rotation: RotationManager,
    fallback: bool,
}

impl RotatingFileWriter {
    pub fn new(config: &FileConfig) -> Result<Self> {
        if let Some(parent) = config.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = open_log_file(&config.path, config.append)?;
        let current_size = if config.append {
            std::fs::metadata(&config.path).map(|m| m.len()).unwrap_or(0)
        } else {
            0
        };

        Ok(Self {
            state: Arc::new(Mutex::new(WriterState {
                file,
                current_size,
                rotation: RotationManager::new(config.rotation.clone()),
                fallback: false,
            })),
            path: config.path.clone(),
        })
    }

    #[cfg(test)]
    fn in_fallback(&self) -> bool {
        self.state.lock().map(|s| s.fallback).unwrap_or(false)
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = RotatingWriterGuard;

    fn make_writer(&'a self) -> Self::Writer {
        RotatingWriterGuard {
            state: self.state.clone(),
            path: self.path.clone(),
        }
    }
}

pub struct RotatingWriterGuard {
    state: Arc<Mutex<WriterState>>,
    path: PathBuf,
}

impl RotatingWriterGuard {
    fn write_to_file(&self, state: &mut WriterState, buf: &[u8]) -> io::Result<usize> {
        if state.rotation.should_rotate(state.current_size, buf.len()) {
            state.file.flush()?;
            state
                .rotation
                .rotate(&self.path)
                .map_err(|e| io::Error::other(e.to_string()))?;
            state.file = open_log_file(&self.path, false)?;
            state.current_size = 0;
        }

        state.file.write_all(buf)?;
        state.current_size += buf.len() as u64;
        Ok(buf.len())
    }
}

impl Write for RotatingWriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))?;

        if state.fallback {
            return io::stderr().write(buf);
        }

        match self.write_to_file(&mut state, buf) {
            Ok(written) => Ok(written),
            Err(e) => {
                state.fallback = true;
                eprintln!(
                    "[logger] writing {} failed, falling back to stderr: {}",
                    self.path.display(),
                    e
                );
                io::stderr().write(buf)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))?;

        if state.fallback {
            return io::stderr().flush();
        }
        state.file.flush()
    }
}

impl Drop for RotatingWriterGuard {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            let _ = state.file.flush();
        }
    }
}

fn open_log_file(path: &Path, append: bool) -> io::Result<BufWriter<File>> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)?;
    Ok(BufWriter::new(file))
}
