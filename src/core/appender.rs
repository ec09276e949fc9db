//! Appender trait for the writer thread's output destination

use super::error::Result;

/// Where formatted lines end up
///
/// Only the writer thread ever calls an appender, one line at a time.
pub trait Appender: Send {
    /// Persist one formatted line, bytes unchanged
    fn append(&mut self, line: &str) -> Result<()>;
    fn name(&self) -> &str;
}
