//! Timestamp formatting utilities
//!
//! Provides the human-readable timestamp column of each CSV record and the
//! clock the sink reads time from.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::sync::Arc;

const COMPACT_PATTERN: &str = "%Y%m%d_%H%M%S%3f";

/// Human-readable timestamp format options
///
/// # Examples
///
/// ```
/// use csv_log_sink::core::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(TimestampFormat::Compact.format(&at), "20250108_103045000");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Compact sortable format with milliseconds: `20250108_103045123`
    ///
    /// This is the default format of the CSV sink.
    #[default]
    Compact,

    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601,

    /// RFC 3339 format: `2025-01-08T10:30:45.123+00:00`
    Rfc3339,

    /// Same layout as `Compact`, rendered in the host's local time zone
    LocalCompact,

    /// Custom strftime format
    ///
    /// ```
    /// use csv_log_sink::core::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%Y-%m-%d".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format a `DateTime<Utc>` according to this format
    ///
    /// A `Custom` pattern chrono cannot render falls back to `Compact`.
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Compact => datetime.format(COMPACT_PATTERN).to_string(),
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Rfc3339 => {
                datetime.to_rfc3339_opts(chrono::SecondsFormat::Millis, false)
            }
            TimestampFormat::LocalCompact => datetime
                .with_timezone(&Local)
                .format(COMPACT_PATTERN)
                .to_string(),
            TimestampFormat::Custom(format_str) => {
                let mut rendered = String::new();
                match write!(rendered, "{}", datetime.format(format_str)) {
                    Ok(()) => rendered,
                    Err(_) => datetime.format(COMPACT_PATTERN).to_string(),
                }
            }
        }
    }

    /// Whether every specifier of a `Custom` pattern is known to chrono
    pub fn is_valid(&self) -> bool {
        match self {
            TimestampFormat::Custom(format_str) => {
                !StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error))
            }
            _ => true,
        }
    }

    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            TimestampFormat::Compact => "Compact with milliseconds (20250108_103045123)",
            TimestampFormat::Iso8601 => "ISO 8601 with milliseconds (2025-01-08T10:30:45.123Z)",
            TimestampFormat::Rfc3339 => "RFC 3339 with timezone (2025-01-08T10:30:45.123+00:00)",
            TimestampFormat::LocalCompact => "Compact with milliseconds in local time",
            TimestampFormat::Custom(_) => "Custom strftime format",
        }
    }
}

/// Source of the current time for new records
///
/// Defaults to the system clock. A fixed clock makes record contents
/// reproducible in tests.
///
/// Time is always read as UTC. The human-readable column is rendered in UTC
/// as well unless the sink uses [`TimestampFormat::LocalCompact`]; the
/// epoch column does not depend on the time zone.
#[derive(Clone)]
pub struct Clock(Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>);

impl Clock {
    pub fn system() -> Self {
        Clock(Arc::new(Utc::now))
    }

    /// A clock that always reports `at`
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Clock(Arc::new(move || at))
    }

    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        Clock(Arc::new(f))
    }

    #[inline]
    pub fn now(&self) -> DateTime<Utc> {
        (self.0)()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Clock")
    }
}
