//! Gzip of rotated log archives

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::logger::error::Result;

/// Replaces `path` with `path.gz` and returns the new location.
pub fn compress_file(path: &Path) -> Result<PathBuf> {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    let compressed = PathBuf::from(name);

    let mut input = BufReader::new(File::open(path)?);
    let mut encoder = GzEncoder::new(File::create(&compressed)?, Compression::default());
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)?;
    Ok(compressed)
}
