//! Logging macros for ergonomic log message formatting.
//!
//! These macros work with anything exposing `log` / `log_tagged` methods,
//! that is [`CsvLogSink`](crate::CsvLogSink) and [`SinkHandle`](crate::SinkHandle).
//!
//! # Examples
//!
//! ```no_run
//! use csv_log_sink::prelude::*;
//! use csv_log_sink::info;
//!
//! let sink = CsvLogSink::open(SinkConfig::new("/var/log/app")).unwrap();
//!
//! info!(sink, "Server started");
//!
//! let port = 8080;
//! info!(sink, "Server listening on port {}", port);
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```no_run
/// # use csv_log_sink::prelude::*;
/// # let sink = CsvLogSink::open(SinkConfig::new("/tmp/log")).unwrap();
/// use csv_log_sink::log;
/// log!(sink, LogLevel::Info, "Simple message");
/// log!(sink, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($sink:expr, $level:expr, $($arg:tt)+) => {
        $sink.log($level, format!($($arg)+))
    };
}

/// Log a message with a tag for this call only.
///
/// # Examples
///
/// ```no_run
/// # use csv_log_sink::prelude::*;
/// # let sink = CsvLogSink::open(SinkConfig::new("/tmp/log")).unwrap();
/// use csv_log_sink::log_tagged;
/// log_tagged!(sink, LogLevel::Warn, "NET", "Timeout after {} ms", 300);
/// ```
#[macro_export]
macro_rules! log_tagged {
    ($sink:expr, $level:expr, $tag:expr, $($arg:tt)+) => {
        $sink.log_tagged($level, $tag, format!($($arg)+))
    };
}

/// Log a verbose-level message.
#[macro_export]
macro_rules! verbose {
    ($sink:expr, $($arg:tt)+) => {
        $crate::log!($sink, $crate::LogLevel::Verbose, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($sink:expr, $($arg:tt)+) => {
        $crate::log!($sink, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($sink:expr, $($arg:tt)+) => {
        $crate::log!($sink, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($sink:expr, $($arg:tt)+) => {
        $crate::log!($sink, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```no_run
/// # use csv_log_sink::prelude::*;
/// # let sink = CsvLogSink::open(SinkConfig::new("/tmp/log")).unwrap();
/// use csv_log_sink::error;
/// error!(sink, "Failed to connect to database");
/// error!(sink, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($sink:expr, $($arg:tt)+) => {
        $crate::log!($sink, $crate::LogLevel::Error, $($arg)+)
    };
}
