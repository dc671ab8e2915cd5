//! Two-channel event logging
//!
//! Every message goes to the primary sink (tracing). When a log file is
//! configured, the same message is also appended there with a timestamp.
//! File write failures are reported through the primary sink and swallowed:
//! a broken log file must never prevent or abort a MIDI send.

use anyhow::{Context, Result};
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Operator-visible log with an optional append-only file mirror
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    file_path: Option<PathBuf>,
}

impl EventLog {
    /// Create an event log; `file_path: None` disables the file mirror
    pub fn new(file_path: Option<PathBuf>) -> Self {
        Self { file_path }
    }

    /// Log an informational message
    pub fn info(&self, message: &str) {
        info!("{}", message);
        self.mirror_to_file(message);
    }

    /// Log a warning message
    pub fn warn(&self, message: &str) {
        warn!("{}", message);
        self.mirror_to_file(message);
    }

    /// Log an error message
    pub fn error(&self, message: &str) {
        error!("{}", message);
        self.mirror_to_file(message);
    }

    /// Best-effort file append; failures go to the primary sink only
    fn mirror_to_file(&self, message: &str) {
        if let Err(e) = self.append(message) {
            error!("FILE LOG ERROR: Could not write to log file. {:#}", e);
        }
    }

    /// Append one timestamped line to the configured file, if any
    fn append(&self, message: &str) -> Result<()> {
        let path = match &self.file_path {
            Some(p) => p,
            None => return Ok(()),
        };

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;

        writeln!(file, "[{}] {}", timestamp, message)
            .with_context(|| format!("Failed to append to log file: {}", path.display()))?;

        Ok(())
    }
}
