//! # CSV Log Sink
//!
//! A single-writer, size-rotating CSV log sink. Log calls from any thread
//! are formatted into one CSV line each and handed to a dedicated writer
//! thread, which appends them to `logs_0.csv`, `logs_1.csv`, ... in the
//! configured folder.
//!
//! ## Features
//!
//! - **Non-blocking**: callers only format and enqueue; all file I/O runs on
//!   the writer thread
//! - **Crash-safe writes**: every line is opened, appended, flushed and
//!   closed on its own
//! - **Size-based rotation**: a new file starts once the active one reaches
//!   the configured size
//! - **Never fatal**: I/O failures and submissions after shutdown drop the
//!   line and are counted in [`SinkMetrics`]

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{CsvFileAppender, LogFileFamily, RotationState};
    pub use crate::core::{
        Appender, Clock, CsvFormatter, CsvLogSink, LogLevel, LogRecord, LoggerError,
        OverflowPolicy, Result, SinkBuilder, SinkConfig, SinkHandle, SinkMetrics,
        TimestampFormat, DEFAULT_SHUTDOWN_TIMEOUT,
    };
}

pub use appenders::{CsvFileAppender, LogFileFamily, RotationState};
pub use core::{
    Appender, Clock, CsvFormatter, CsvLogSink, LogLevel, LogRecord, LoggerError, OverflowPolicy,
    Result, SinkBuilder, SinkConfig, SinkHandle, SinkMetrics, TimestampFormat,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
