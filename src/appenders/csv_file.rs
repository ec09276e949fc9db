//! CSV file appender with size-based rotation
//!
//! Every line is written with its own open/append/flush/close cycle. No
//! handle is kept between lines, so a crash between writes never leaves
//! buffered data behind, and the rotation decision always sees the real
//! file sizes.

use super::rotation::{LogFileFamily, RotationState};
use crate::core::appender::Appender;
use crate::core::error::{LoggerError, Result};
use crate::core::metrics::SinkMetrics;
use parking_lot::RwLock;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

/// Appender writing into a [`LogFileFamily`]
///
/// # Examples
///
/// ```no_run
/// use csv_log_sink::appenders::{CsvFileAppender, LogFileFamily};
/// use csv_log_sink::core::Appender;
///
/// let family = LogFileFamily::new("/var/log/app", "logs", 500 * 1024);
/// let mut appender = CsvFileAppender::new(family);
/// appender.append("1736332245123,20250108_103045123,INFO,LOGGER,started\n").unwrap();
/// ```
pub struct CsvFileAppender {
    family: LogFileFamily,
    state: Arc<RwLock<RotationState>>,
    metrics: Option<Arc<SinkMetrics>>,
}

impl CsvFileAppender {
    pub fn new(family: LogFileFamily) -> Self {
        let state = Arc::new(RwLock::new(family.state(0)));
        Self {
            family,
            state,
            metrics: None,
        }
    }

    /// Count rotations in `metrics`
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<SinkMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Shared view of the rotation state, updated after every successful write
    pub fn state_handle(&self) -> Arc<RwLock<RotationState>> {
        Arc::clone(&self.state)
    }

    pub fn family(&self) -> &LogFileFamily {
        &self.family
    }

    fn ensure_folder(&self) -> Result<()> {
        let folder = self.family.folder();
        if folder.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(folder).map_err(|e| {
            LoggerError::io_operation(
                "create log directory",
                format!("Failed to create directory '{}'", folder.display()),
                e,
            )
        })
    }

    fn write_to(path: &Path, line: &str) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Failed to open: {}", e),
                )
            })?;

        // The writer is dropped on every path out of this function, which
        // closes the handle even when the write failed.
        let mut writer = BufWriter::new(file);
        writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Failed to write log line: {}", e),
                )
            })
    }
}

impl Appender for CsvFileAppender {
    fn append(&mut self, line: &str) -> Result<()> {
        self.ensure_folder()?;

        let target = self.family.resolve().map_err(|e| {
            LoggerError::io_operation(
                "select log file",
                format!("Failed to inspect '{}'", self.family.folder().display()),
                e,
            )
        })?;

        Self::write_to(&target.path, line)?;

        self.state.write().current_file_index = target.index;
        if target.rotated {
            if let Some(ref metrics) = self.metrics {
                metrics.record_rotation();
            }
            tracing::debug!(index = target.index, path = %target.path.display(), "rotated log file");
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "CsvFileAppender"
    }
}
