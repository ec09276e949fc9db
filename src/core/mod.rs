//! Core sink types and traits

pub mod appender;
pub mod config;
pub mod csv_format;
pub mod error;
pub mod log_level;
pub mod log_record;
pub mod metrics;
pub mod overflow_policy;
pub mod queue;
pub mod sink;
pub mod timestamp;
pub mod worker;

pub use appender::Appender;
pub use config::{SinkConfig, DEFAULT_FILE_PREFIX, DEFAULT_MAX_BYTES};
pub use csv_format::{format_line, format_tag, CsvFormatter, DEFAULT_TAG, LINE_SEPARATOR};
pub use error::{LoggerError, Result};
pub use log_level::LogLevel;
pub use log_record::LogRecord;
pub use metrics::SinkMetrics;
pub use overflow_policy::OverflowPolicy;
pub use queue::{Command, QueueReceiver, SubmissionQueue};
pub use sink::{CsvLogSink, SinkBuilder, SinkHandle, DEFAULT_SHUTDOWN_TIMEOUT};
pub use timestamp::{Clock, TimestampFormat};
pub use worker::WriterWorker;
