//! Integration tests for the CSV log sink
//!
//! These tests verify:
//! - CSV line layout and newline replacement on disk
//! - Size-based rotation across the file family
//! - Ordering across rotation boundaries
//! - Failure isolation in the writer
//! - Lifecycle: shutdown, abort, submission after close

use csv_log_sink::appenders::{CsvFileAppender, LogFileFamily};
use csv_log_sink::core::csv_format::{LINE_SEPARATOR, NEW_LINE_REPLACEMENT};
use csv_log_sink::prelude::*;
use chrono::{TimeZone, Utc};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

fn fixed_clock() -> Clock {
    Clock::fixed(
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime"),
    )
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap_or_else(|e| panic!("reading {}: {}", name, e))
}

fn message_column(line: &str) -> &str {
    line.splitn(5, ',').nth(4).expect("message column")
}

#[test]
fn test_csv_layout_on_disk() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut sink = CsvLogSink::builder()
        .folder(temp_dir.path())
        .clock(fixed_clock())
        .build()
        .expect("Failed to open sink");

    sink.submit(6, None, "disk full");
    sink.submit(3, Some("LOGGER"), "same tag collapses");
    sink.submit(4, Some("NET"), "composed tag");
    assert!(sink.shutdown(DEFAULT_SHUTDOWN_TIMEOUT));

    let content = read(temp_dir.path(), "logs_0.csv");
    let expected = [
        "1736332245000,20250108_103045000,ERROR,LOGGER,disk full",
        "1736332245000,20250108_103045000,DEBUG,LOGGER,same tag collapses",
        "1736332245000,20250108_103045000,INFO,LOGGER-NET,composed tag",
    ]
    .iter()
    .map(|line| format!("{}{}", line, LINE_SEPARATOR))
    .collect::<String>();
    assert_eq!(content, expected);
}

#[test]
fn test_multiline_message_is_one_record() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut sink = CsvLogSink::open(SinkConfig::new(temp_dir.path())).expect("Failed to open sink");

    let message = format!(
        "User login{0}ERROR fake entry{0}INFO continuation",
        LINE_SEPARATOR
    );
    sink.info(&message);
    sink.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

    let content = read(temp_dir.path(), "logs_0.csv");
    assert_eq!(content.matches(LINE_SEPARATOR).count(), 1);
    assert_eq!(content.matches(NEW_LINE_REPLACEMENT).count(), 2);

    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1, "Record should be a single line");
    assert_eq!(
        message_column(lines[0]),
        "User login <br> ERROR fake entry <br> INFO continuation"
    );
}

#[test]
fn test_three_messages_split_by_rotation() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let first = CsvFormatter::new("LOGGER")
        .with_clock(fixed_clock())
        .format(4, None, "line 1");

    // Line 1 alone reaches the threshold, lines 2 and 3 together do not
    let max_bytes = first.len() as u64;
    let mut sink = CsvLogSink::builder()
        .folder(temp_dir.path())
        .max_bytes(max_bytes)
        .clock(fixed_clock())
        .build()
        .expect("Failed to open sink");

    sink.info("line 1");
    sink.info("line 2");
    sink.info("line 3");
    sink.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

    let file0: Vec<String> = read(temp_dir.path(), "logs_0.csv")
        .lines()
        .map(|l| message_column(l).to_string())
        .collect();
    let file1: Vec<String> = read(temp_dir.path(), "logs_1.csv")
        .lines()
        .map(|l| message_column(l).to_string())
        .collect();

    assert_eq!(file0, vec!["line 1"]);
    assert_eq!(file1, vec!["line 2", "line 3"]);
    assert!(!temp_dir.path().join("logs_2.csv").exists());
    assert_eq!(sink.metrics().rotations(), 1);
}

#[test]
fn test_full_file_is_never_appended_again() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let max_bytes = 200;
    let mut sink = CsvLogSink::builder()
        .folder(temp_dir.path())
        .max_bytes(max_bytes)
        .build()
        .expect("Failed to open sink");

    for i in 0..100 {
        sink.info(format!("Test message number {}", i));
    }
    sink.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

    let family = LogFileFamily::new(temp_dir.path(), "logs", max_bytes);
    let files = family.existing_files();
    assert!(files.len() > 1, "expected rotation to create several files");

    // Every file but the last crossed the threshold with its final line and
    // was below it before that line
    for path in &files[..files.len() - 1] {
        let content = fs::read_to_string(path).unwrap();
        let size = content.len() as u64;
        let last_line_len = content.lines().last().unwrap().len() as u64 + LINE_SEPARATOR.len() as u64;
        assert!(size >= max_bytes, "{} is below the threshold", path.display());
        assert!(size - last_line_len < max_bytes, "{} was appended after it was full", path.display());
    }
}

#[test]
fn test_order_preserved_across_rotation() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut sink = CsvLogSink::builder()
        .folder(temp_dir.path())
        .max_bytes(256)
        .build()
        .expect("Failed to open sink");

    for i in 0..200 {
        sink.info(format!("{}", i));
    }
    sink.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

    let family = LogFileFamily::new(temp_dir.path(), "logs", 256);
    let messages: Vec<String> = family
        .existing_files()
        .iter()
        .flat_map(|path| {
            fs::read_to_string(path)
                .unwrap()
                .lines()
                .map(|l| message_column(l).to_string())
                .collect::<Vec<_>>()
        })
        .collect();

    let expected: Vec<String> = (0..200).map(|i| i.to_string()).collect();
    assert_eq!(messages, expected);
}

#[test]
fn test_resumes_existing_family() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("logs_0.csv"), "x".repeat(100)).unwrap();
    fs::write(temp_dir.path().join("logs_1.csv"), "y\n").unwrap();

    let mut sink = CsvLogSink::builder()
        .folder(temp_dir.path())
        .max_bytes(100)
        .build()
        .expect("Failed to open sink");
    sink.info("appended");
    sink.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

    let content = read(temp_dir.path(), "logs_1.csv");
    assert!(content.starts_with("y\n"));
    assert!(content.ends_with(&format!(",appended{}", LINE_SEPARATOR)));
    assert_eq!(read(temp_dir.path(), "logs_0.csv"), "x".repeat(100));
}

#[test]
fn test_custom_prefix_and_timestamp() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut sink = CsvLogSink::builder()
        .folder(temp_dir.path())
        .file_prefix("audit")
        .tag("AUDIT")
        .timestamp_format(TimestampFormat::Iso8601)
        .clock(fixed_clock())
        .build()
        .expect("Failed to open sink");

    sink.warn("policy changed");
    sink.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

    assert!(!temp_dir.path().join("logs_0.csv").exists());
    assert_eq!(
        read(temp_dir.path(), "audit_0.csv"),
        format!(
            "1736332245000,2025-01-08T10:30:45.000Z,WARN,AUDIT,policy changed{}",
            LINE_SEPARATOR
        )
    );
}

#[test]
fn test_failed_write_does_not_block_next() {
    // Fails on the chosen call, then delegates to the real CSV appender
    struct FlakyAppender {
        inner: CsvFileAppender,
        calls: Arc<AtomicUsize>,
        fail_on: usize,
    }

    impl Appender for FlakyAppender {
        fn append(&mut self, line: &str) -> Result<()> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == self.fail_on {
                return Err(LoggerError::file_appender("logs_0.csv", "simulated failure"));
            }
            self.inner.append(line)
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let calls = Arc::new(AtomicUsize::new(0));
    let appender = FlakyAppender {
        inner: CsvFileAppender::new(LogFileFamily::new(temp_dir.path(), "logs", 1024)),
        calls: Arc::clone(&calls),
        fail_on: 1,
    };

    let mut sink = CsvLogSink::with_appender(SinkConfig::new(temp_dir.path()), appender)
        .expect("Failed to open sink");
    sink.info("message 0");
    sink.info("message 1");
    sink.info("message 2");
    sink.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

    let messages: Vec<String> = read(temp_dir.path(), "logs_0.csv")
        .lines()
        .map(|l| message_column(l).to_string())
        .collect();
    assert_eq!(messages, vec!["message 0", "message 2"]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(sink.metrics().written(), 2);
    assert_eq!(sink.metrics().dropped(), 1);
}

#[test]
fn test_unwritable_folder_is_absorbed() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let blocked = temp_dir.path().join("blocked");
    fs::write(&blocked, "a file, not a folder").unwrap();

    let mut sink = CsvLogSink::open(SinkConfig::new(&blocked)).expect("Failed to open sink");
    for i in 0..5 {
        sink.error(format!("lost {}", i));
    }
    assert!(sink.shutdown(DEFAULT_SHUTDOWN_TIMEOUT));

    assert_eq!(sink.metrics().written(), 0);
    assert_eq!(sink.metrics().dropped(), 5);
}

#[test]
fn test_handle_outlives_sink() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let sink = CsvLogSink::open(SinkConfig::new(temp_dir.path())).expect("Failed to open sink");
    let handle = sink.handle();

    handle.info("before close");
    assert!(sink.close());

    // Must neither panic nor block
    handle.info("after close");
    assert_eq!(handle.metrics().rejected(), 1);

    let content = read(temp_dir.path(), "logs_0.csv");
    assert_eq!(content.lines().count(), 1);
}

#[test]
fn test_submit_record() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut sink = CsvLogSink::open(SinkConfig::new(temp_dir.path())).expect("Failed to open sink");

    let record = LogRecord::new(42, "then", "INFO", None, "replayed");
    sink.submit_record(&record);
    sink.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

    assert_eq!(
        read(temp_dir.path(), "logs_0.csv"),
        format!("42,then,INFO,,replayed{}", LINE_SEPARATOR)
    );
}

#[test]
fn test_config_from_json() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let json = format!(
        r#"{{"folder": {}, "max_bytes": 64, "tag": "JSON"}}"#,
        serde_json::to_string(temp_dir.path()).unwrap()
    );
    let config = SinkConfig::from_json_str(&json).expect("valid config");

    let mut sink = CsvLogSink::open(config).expect("Failed to open sink");
    sink.info("configured from json");
    sink.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

    let content = read(temp_dir.path(), "logs_0.csv");
    assert!(content.contains(",INFO,JSON,configured from json"));
}
