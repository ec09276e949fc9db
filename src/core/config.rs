//! Sink configuration
//!
//! The folder, size threshold and tag are resolved by the embedding
//! application; the sink only validates them.

use super::csv_format::DEFAULT_TAG;
use super::error::{LoggerError, Result};
use super::overflow_policy::OverflowPolicy;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 500 KiB, roughly 4000 lines per file
pub const DEFAULT_MAX_BYTES: u64 = 500 * 1024;

pub const DEFAULT_FILE_PREFIX: &str = "logs";

/// Configuration of a [`crate::CsvLogSink`]
///
/// # Examples
///
/// ```
/// use csv_log_sink::SinkConfig;
///
/// let config = SinkConfig::new("/var/log/app")
///     .with_max_bytes(64 * 1024)
///     .with_tag("APP");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Folder holding the `<prefix>_<index>.csv` family
    pub folder: PathBuf,
    /// Size at which the active file is considered full
    pub max_bytes: u64,
    /// Base tag composed with per-call tags
    pub tag: String,
    pub file_prefix: String,
    pub timestamp_format: TimestampFormat,
    /// `None` keeps the queue unbounded
    pub queue_capacity: Option<usize>,
    /// Only consulted when `queue_capacity` is set
    pub overflow_policy: OverflowPolicy,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::new(),
            max_bytes: DEFAULT_MAX_BYTES,
            tag: DEFAULT_TAG.to_string(),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            timestamp_format: TimestampFormat::default(),
            queue_capacity: None,
            overflow_policy: OverflowPolicy::default(),
        }
    }
}

impl SinkConfig {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            ..Self::default()
        }
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    /// Parse a configuration from JSON; missing fields take their defaults
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is malformed or the result fails validation
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SinkConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed or validated
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading sink configuration",
                format!("Failed to read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json_str(&json)
    }

    /// Reject configurations that cannot describe a file family
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` naming the offending field
    pub fn validate(&self) -> Result<()> {
        if self.folder.as_os_str().is_empty() {
            return Err(LoggerError::config("SinkConfig", "folder must not be empty"));
        }
        if self.max_bytes == 0 {
            return Err(LoggerError::config(
                "SinkConfig",
                "max_bytes must be greater than zero",
            ));
        }
        if self.tag.is_empty() {
            return Err(LoggerError::config("SinkConfig", "tag must not be empty"));
        }
        if self.file_prefix.is_empty() {
            return Err(LoggerError::config("SinkConfig", "file_prefix must not be empty"));
        }
        if self.file_prefix.contains(['/', '\\']) {
            return Err(LoggerError::config(
                "SinkConfig",
                format!("file_prefix '{}' must not contain path separators", self.file_prefix),
            ));
        }
        if !self.timestamp_format.is_valid() {
            return Err(LoggerError::config(
                "SinkConfig",
                format!("timestamp_format {:?} is not a valid strftime pattern", self.timestamp_format),
            ));
        }
        if self.queue_capacity == Some(0) {
            return Err(LoggerError::config(
                "SinkConfig",
                "queue_capacity must be greater than zero",
            ));
        }
        Ok(())
    }
}
