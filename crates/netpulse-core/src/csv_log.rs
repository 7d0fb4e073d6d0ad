//! Append-only CSV results log.
//!
//! The header row is written only when the file does not exist yet or is
//! empty, so repeated runs keep appending to one table.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::format::{csv_header, csv_row};
use crate::record::MetricRecord;

#[derive(Debug, Clone)]
pub struct CsvLog {
    path: PathBuf,
}

impl CsvLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the file is absent or has zero length.
    pub fn needs_header(&self) -> std::io::Result<bool> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() == 0),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(true),
            Err(e) => Err(e),
        }
    }

    /// Append one record, writing the header first if needed.
    pub fn append(&self, record: &MetricRecord) -> std::io::Result<()> {
        let write_header = self.needs_header()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        if write_header {
            debug!("writing CSV header to {}", self.path.display());
            writeln!(writer, "{}", csv_header())?;
        }
        writeln!(writer, "{}", csv_row(record))?;
        writer.flush()
    }
}
