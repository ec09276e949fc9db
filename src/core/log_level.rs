//! Log level definitions
//!
//! Priorities follow the Android numbering (2 = verbose .. 7 = assert). The
//! sink never filters on them; they only select the label written to the
//! level column.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label written for priorities outside the known range
pub const UNKNOWN_LABEL: &str = "UNKNOWN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum LogLevel {
    Verbose = 2,
    Debug = 3,
    #[default]
    Info = 4,
    Warn = 5,
    Error = 6,
    Assert = 7,
}

impl LogLevel {
    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Verbose => "VERBOSE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Assert => "ASSERT",
        }
    }

    /// Numeric priority accepted by [`crate::CsvLogSink::submit`]
    pub fn priority(&self) -> i32 {
        *self as i32
    }

    pub fn from_priority(priority: i32) -> Option<Self> {
        match priority {
            2 => Some(LogLevel::Verbose),
            3 => Some(LogLevel::Debug),
            4 => Some(LogLevel::Info),
            5 => Some(LogLevel::Warn),
            6 => Some(LogLevel::Error),
            7 => Some(LogLevel::Assert),
            _ => None,
        }
    }

    /// Label for an arbitrary priority, `UNKNOWN` when out of range
    pub fn label_for(priority: i32) -> &'static str {
        Self::from_priority(priority)
            .map(|level| level.to_str())
            .unwrap_or(UNKNOWN_LABEL)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl From<LogLevel> for i32 {
    fn from(level: LogLevel) -> Self {
        level.priority()
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "VERBOSE" | "TRACE" => Ok(LogLevel::Verbose),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "ASSERT" | "WTF" => Ok(LogLevel::Assert),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
