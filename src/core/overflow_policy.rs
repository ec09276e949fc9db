//! Overflow policies for a bounded submission queue
//!
//! The queue is unbounded unless a capacity is configured. When it is
//! bounded, these policies decide what happens to a line that does not fit.
//! None of them blocks the caller for longer than a fixed bound.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Policy for a full bounded queue
///
/// # Example
///
/// ```
/// use csv_log_sink::OverflowPolicy;
/// use std::time::Duration;
///
/// let policy = OverflowPolicy::default();
/// assert_eq!(policy, OverflowPolicy::AlertAndDrop);
///
/// let policy = OverflowPolicy::BlockWithTimeout(Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Drop the new line, counting it in metrics only
    DropNewest,

    /// Wait up to the given duration for space, then drop
    BlockWithTimeout(Duration),

    /// Drop the new line and emit a warning on the first drop and every
    /// thousandth one after it
    #[default]
    AlertAndDrop,
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::DropNewest => write!(f, "DropNewest"),
            OverflowPolicy::BlockWithTimeout(d) => write!(f, "BlockWithTimeout({:?})", d),
            OverflowPolicy::AlertAndDrop => write!(f, "AlertAndDrop"),
        }
    }
}
