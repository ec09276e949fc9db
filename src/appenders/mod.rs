//! Appender implementations

pub mod csv_file;
pub mod rotation;

pub use csv_file::CsvFileAppender;
pub use rotation::{LogFileFamily, ResolvedFile, RotationState};

// Re-export trait for convenience
pub use crate::core::Appender;
