//! CSV line formatting
//!
//! Each record becomes one physical line:
//!
//! ```text
//! epoch-millis,human-timestamp,level,tag,message
//! ```
//!
//! Line terminators inside the message are replaced with [`NEW_LINE_REPLACEMENT`]
//! so a record never spans two lines. The separator itself is not escaped.

use super::log_level::LogLevel;
use super::log_record::LogRecord;
use super::timestamp::{Clock, TimestampFormat};

/// Platform line terminator appended to every record
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

pub const NEW_LINE_REPLACEMENT: &str = " <br> ";
pub const FIELD_SEPARATOR: char = ',';
pub const DEFAULT_TAG: &str = "LOGGER";

/// Compose the effective tag for one call
///
/// ```
/// use csv_log_sink::core::csv_format::format_tag;
///
/// assert_eq!(format_tag("LOGGER", None), "LOGGER");
/// assert_eq!(format_tag("LOGGER", Some("LOGGER")), "LOGGER");
/// assert_eq!(format_tag("LOGGER", Some("NET")), "LOGGER-NET");
/// ```
pub fn format_tag(base: &str, once_only: Option<&str>) -> String {
    match once_only {
        Some(tag) if !tag.is_empty() && tag != base => format!("{}-{}", base, tag),
        _ => base.to_string(),
    }
}

/// Build one CSV line from already resolved fields
pub fn format_line(
    epoch_millis: i64,
    human_timestamp: &str,
    level: &str,
    tag: &str,
    message: &str,
) -> String {
    let message = if message.contains(LINE_SEPARATOR) {
        message.replace(LINE_SEPARATOR, NEW_LINE_REPLACEMENT)
    } else {
        message.to_string()
    };

    let mut line = String::with_capacity(
        human_timestamp.len() + level.len() + tag.len() + message.len() + 24,
    );
    line.push_str(&epoch_millis.to_string());
    line.push(FIELD_SEPARATOR);
    line.push_str(human_timestamp);
    line.push(FIELD_SEPARATOR);
    line.push_str(level);
    line.push(FIELD_SEPARATOR);
    line.push_str(tag);
    line.push(FIELD_SEPARATOR);
    line.push_str(&message);
    line.push_str(LINE_SEPARATOR);
    line
}

/// Turns log calls into CSV lines for one sink
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    base_tag: String,
    timestamp_format: TimestampFormat,
    clock: Clock,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_TAG)
    }
}

impl CsvFormatter {
    pub fn new(base_tag: impl Into<String>) -> Self {
        Self {
            base_tag: base_tag.into(),
            timestamp_format: TimestampFormat::default(),
            clock: Clock::default(),
        }
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn base_tag(&self) -> &str {
        &self.base_tag
    }

    /// Capture a record for `priority` at the current clock time
    pub fn record(&self, priority: i32, once_only_tag: Option<&str>, message: &str) -> LogRecord {
        let now = self.clock.now();
        let tag = format_tag(&self.base_tag, once_only_tag);
        LogRecord::new(
            now.timestamp_millis(),
            self.timestamp_format.format(&now),
            LogLevel::label_for(priority),
            Some(&tag),
            message,
        )
    }

    pub fn format_record(&self, record: &LogRecord) -> String {
        format_line(
            record.epoch_millis,
            &record.human_timestamp,
            &record.level,
            &record.tag,
            &record.message,
        )
    }

    /// Record and format in one step
    pub fn format(&self, priority: i32, once_only_tag: Option<&str>, message: &str) -> String {
        let record = self.record(priority, once_only_tag, message);
        self.format_record(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn fixed_formatter() -> CsvFormatter {
        let at = Utc
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime");
        CsvFormatter::new("LOGGER").with_clock(Clock::fixed(at))
    }

    #[test]
    fn test_tag_composition() {
        assert_eq!(format_tag("LOGGER", None), "LOGGER");
        assert_eq!(format_tag("LOGGER", Some("")), "LOGGER");
        assert_eq!(format_tag("LOGGER", Some("LOGGER")), "LOGGER");
        assert_eq!(format_tag("LOGGER", Some("NET")), "LOGGER-NET");
    }

    #[test]
    fn test_field_order() {
        let line = format_line(42, "human", "INFO", "TAG", "hello");
        assert_eq!(line, format!("42,human,INFO,TAG,hello{}", LINE_SEPARATOR));
    }

    #[test]
    fn test_empty_tag() {
        let line = format_line(1, "h", "DEBUG", "", "m");
        assert_eq!(line, format!("1,h,DEBUG,,m{}", LINE_SEPARATOR));
    }

    #[test]
    fn test_newlines_replaced() {
        let message = format!("first{0}second{0}third", LINE_SEPARATOR);
        let line = format_line(1, "h", "INFO", "T", &message);

        assert_eq!(line.matches(LINE_SEPARATOR).count(), 1);
        assert!(line.ends_with(LINE_SEPARATOR));
        assert_eq!(line.matches(NEW_LINE_REPLACEMENT).count(), 2);
        assert!(line.contains("first <br> second <br> third"));
    }

    #[test]
    fn test_separator_not_escaped() {
        let line = format_line(1, "h", "INFO", "T", "a,b,c");
        assert!(line.contains(",a,b,c"));
    }

    #[test]
    fn test_formatter_record() {
        let formatter = fixed_formatter();
        let record = formatter.record(5, Some("NET"), "slow response");

        assert_eq!(record.epoch_millis, 1736332245000);
        assert_eq!(record.human_timestamp, "20250108_103045000");
        assert_eq!(record.level, "WARN");
        assert_eq!(record.tag, "LOGGER-NET");
        assert_eq!(record.message, "slow response");
    }

    #[test]
    fn test_formatter_line() {
        let formatter = fixed_formatter();
        let line = formatter.format(4, None, "started");
        assert_eq!(
            line,
            format!("1736332245000,20250108_103045000,INFO,LOGGER,started{}", LINE_SEPARATOR)
        );
    }

    #[test]
    fn test_unknown_priority_label() {
        let line = fixed_formatter().format(42, None, "odd");
        assert!(line.contains(",UNKNOWN,LOGGER,odd"));
    }
}
