//! Error types for the CSV log sink

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Bounded queue is full
    #[error("Log queue full: {capacity} lines buffered")]
    QueueFull { capacity: usize },

    /// Writer thread is gone
    #[error("Log sink already stopped")]
    SinkStopped,

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Writing a line to a log file failed
    #[error("File appender error for '{path}': {message}")]
    FileAppenderError { path: String, message: String },

    /// Writer thread could not be started
    #[error("Failed to spawn writer thread: {0}")]
    WorkerSpawn(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file appender error
    pub fn file_appender(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileAppenderError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::config("SinkConfig", "folder must not be empty");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::file_appender("/var/log/logs_0.csv", "Permission denied");
        assert!(matches!(err, LoggerError::FileAppenderError { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::QueueFull { capacity: 16 };
        assert_eq!(err.to_string(), "Log queue full: 16 lines buffered");

        let err = LoggerError::config("SinkConfig", "max_bytes must be greater than zero");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for SinkConfig: max_bytes must be greater than zero"
        );

        let err = LoggerError::file_appender("/tmp/logs_3.csv", "Disk full");
        assert_eq!(
            err.to_string(),
            "File appender error for '/tmp/logs_3.csv': Disk full"
        );
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("creating log folder", "cannot create /logs", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("creating log folder"));
        assert!(err.to_string().contains("cannot create /logs"));
    }

    #[test]
    fn test_io_errors_keep_their_context() {
        use std::error::Error as _;

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = LoggerError::io_operation("reading sink configuration", "missing.json", io_err);

        let source = err.source().expect("io source");
        assert_eq!(source.to_string(), "no such file");
    }
}
