//! Log record structure

use serde::{Deserialize, Serialize};

/// One log call, captured at submission time
///
/// Records are immutable once built; the formatter turns each into exactly
/// one CSV line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub epoch_millis: i64,
    pub human_timestamp: String,
    pub level: String,
    /// Effective tag, empty when none
    pub tag: String,
    pub message: String,
}

impl LogRecord {
    pub fn new(
        epoch_millis: i64,
        human_timestamp: impl Into<String>,
        level: impl Into<String>,
        tag: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            epoch_millis,
            human_timestamp: human_timestamp.into(),
            level: level.into(),
            tag: tag.unwrap_or_default().to_string(),
            message: message.into(),
        }
    }
}
