//! Numbered archive rotation.
//!
//! The live file `service.log` is renamed to `service.log.1`, older archives
//! shift up by one (`.1` -> `.2` ...) and whatever would land past
//! `max_files` is removed. Archives may carry a `.gz` suffix when
//! compression is on; both forms are shifted.

use std::fs;
use std::path::{Path, PathBuf};

use crate::logger::compression::compress_file;
use crate::logger::config::RotationConfig;
use crate::logger::error::Result;

pub struct RotationManager {
    config: RotationConfig,
}

impl RotationManager {
    pub fn new(config: RotationConfig) -> Self {
        Self { config }
    }

    /// True once the pending write would push the file past `max_size`.
    pub fn should_rotate(&self, current_size: u64, incoming: usize) -> bool {
        current_size > 0 && current_size + incoming as u64 > self.config.max_size
    }

    /// Archives the live file. The caller reopens `live` afterwards.
    pub fn rotate(&self, live: &Path) -> Result<()> {
        let max = self.config.max_files;

        for gz in [false, true] {
            remove_if_exists(&archive_path(live, max, gz))?;
        }

        for index in (1..max).rev() {
            for gz in [false, true] {
                let from = archive_path(live, index, gz);
                if from.exists() {
                    fs::rename(&from, archive_path(live, index + 1, gz))?;
                }
            }
        }

        if live.exists() {
            let first = archive_path(live, 1, false);
            fs::rename(live, &first)?;
            if self.config.compress {
                compress_file(&first)?;
            }
        }

        Ok(())
    }
}

fn archive_path(live: &Path, index: usize, gz: bool) -> PathBuf {
    let mut name = live.as_os_str().to_owned();
    name.push(format!(".{index}"));
    if gz {
        name.push(".gz");
    }
    PathBuf::from(name)
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
