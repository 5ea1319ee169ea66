mod entry;
mod style;

pub use entry::{EntryKind, LogEntry};
pub use style::Style;

use crate::config::Config;
use crate::error::{QtraceError, Result};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Appends rendered entries to the log sink.
///
/// Each entry goes out in a single `write_all` under the sink lock, so
/// entries from different threads never interleave mid-line.
pub struct Writer {
    path: PathBuf,
    color: AtomicBool,
    sink: Mutex<Option<File>>,
}

impl Writer {
    pub fn new(path: impl Into<PathBuf>, color: bool) -> Self {
        Self {
            path: path.into(),
            color: AtomicBool::new(color),
            sink: Mutex::new(None),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.output_path.clone(), config.color)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn color(&self) -> bool {
        self.color.load(Ordering::Relaxed)
    }

    pub fn set_color(&self, on: bool) {
        self.color.store(on, Ordering::Relaxed);
    }

    /// Append raw text, creating the sink if it does not exist.
    pub fn append(&self, text: &str) -> Result<()> {
        let mut sink = self.sink.lock();

        // reopen if someone removed the file under us
        if sink.is_some() && !self.path.exists() {
            *sink = None;
        }
        if sink.is_none() {
            *sink = Some(self.open()?);
        }

        let result = match sink.as_mut() {
            Some(file) => file.write_all(text.as_bytes()).and_then(|_| file.flush()),
            None => Ok(()),
        };
        result.map_err(|source| {
            *sink = None;
            self.io_error(source)
        })
    }

    /// Render and append an entry. Failures are reported, never raised.
    pub fn write_entry(&self, entry: &LogEntry) {
        if let Err(e) = self.append(&entry.render(self.color())) {
            log::warn!("dropping log entry: {}", e);
        }
    }

    /// Empty the sink.
    pub fn truncate(&self) -> Result<()> {
        let mut sink = self.sink.lock();
        *sink = None;
        File::create(&self.path)
            .map(drop)
            .map_err(|source| self.io_error(source))
    }

    fn open(&self) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> QtraceError {
        QtraceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
