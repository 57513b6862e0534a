//! Output Sink Module
//!
//! Where GET and LIST results are written, one line per entry:
//!
//! ```text
//! {Key:big power Value:big responsibility}
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::config::OutputTarget;
use crate::error::{RelayError, Result};

/// Receives entries produced by GET and LIST commands
///
/// Shared by every worker; each call is one independent write.
pub trait OutputSink: Send + Sync {
    fn write_entry(&self, key: &str, value: &str) -> Result<()>;
}

/// Render one output line (without the trailing newline)
pub fn format_entry(key: &str, value: &str) -> String {
    format!("{{Key:{} Value:{}}}", key, value)
}

/// Open the sink named by an [`OutputTarget`]
pub fn open(target: &OutputTarget) -> Result<Box<dyn OutputSink>> {
    match target {
        OutputTarget::File(path) => Ok(Box::new(FileSink::open(path)?)),
        OutputTarget::Stdout => Ok(Box::new(StdoutSink)),
    }
}

// =============================================================================
// File
// =============================================================================

/// Appends lines to a file, creating it if needed
pub struct FileSink {
    writer: Mutex<LineWriter<File>>,
    path: PathBuf,
}

impl FileSink {
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| RelayError::Sink(format!("cannot open {}: {}", path.display(), e)))?;

        Ok(Self {
            writer: Mutex::new(LineWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for FileSink {
    fn write_entry(&self, key: &str, value: &str) -> Result<()> {
        let mut writer = self.writer.lock();
        writeln!(writer, "{}", format_entry(key, value))
            .map_err(|e| RelayError::Sink(format!("write to {} failed: {}", self.path.display(), e)))
    }
}

// =============================================================================
// Stdout
// =============================================================================

/// Writes lines to standard output
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_entry(&self, key: &str, value: &str) -> Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{}", format_entry(key, value))
            .map_err(|e| RelayError::Sink(format!("write to stdout failed: {}", e)))
    }
}

// =============================================================================
// Memory
// =============================================================================

/// Collects entries in write order
#[derive(Default)]
pub struct MemorySink {
    entries: Mutex<Vec<(String, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far
    pub fn entries(&self) -> Vec<(String, String)> {
        self.entries.lock().clone()
    }

    /// Rendered lines, as a file sink would contain them
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .map(|(k, v)| format_entry(k, v))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Remove and return everything written so far
    pub fn take(&self) -> Vec<(String, String)> {
        std::mem::take(&mut *self.entries.lock())
    }
}

impl OutputSink for MemorySink {
    fn write_entry(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().push((key.to_string(), value.to_string()));
        Ok(())
    }
}

impl<S: OutputSink + ?Sized> OutputSink for std::sync::Arc<S> {
    fn write_entry(&self, key: &str, value: &str) -> Result<()> {
        (**self).write_entry(key, value)
    }
}
