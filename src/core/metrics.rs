//! Sink metrics for observability
//!
//! Logging failures are never reported to the caller, so these counters are
//! the only place where lost lines become visible.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared between producers and the writer thread
///
/// # Example
///
/// ```
/// use csv_log_sink::SinkMetrics;
///
/// let metrics = SinkMetrics::new();
///
/// metrics.record_submitted();
/// metrics.record_written();
///
/// assert_eq!(metrics.submitted(), 1);
/// assert_eq!(metrics.written(), 1);
/// ```
#[derive(Debug)]
pub struct SinkMetrics {
    /// Lines accepted by the submission queue
    submitted: AtomicU64,

    /// Lines appended and flushed to a log file
    written: AtomicU64,

    /// Lines discarded by the writer (I/O failure or abort)
    dropped: AtomicU64,

    /// Lines refused at submission (queue closed or full)
    rejected: AtomicU64,

    /// Number of times a bounded queue was found full
    queue_full_events: AtomicU64,

    /// Number of times a write moved to a new file index
    rotations: AtomicU64,
}

impl SinkMetrics {
    pub const fn new() -> Self {
        Self {
            submitted: AtomicU64::new(0),
            written: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            queue_full_events: AtomicU64::new(0),
            rotations: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queue_full_events(&self) -> u64 {
        self.queue_full_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rotations(&self) -> u64 {
        self.rotations.load(Ordering::Relaxed)
    }

    /// Lines accepted but not yet written or dropped
    pub fn pending(&self) -> u64 {
        self.submitted()
            .saturating_sub(self.written())
            .saturating_sub(self.dropped())
    }

    // The record_* methods return the previous value.

    #[inline]
    pub fn record_submitted(&self) -> u64 {
        self.submitted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected(&self) -> u64 {
        self.rejected.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_queue_full(&self) -> u64 {
        self.queue_full_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rotation(&self) -> u64 {
        self.rotations.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of lost lines as a percentage (0.0 - 100.0)
    ///
    /// Both writer drops and submission rejections count as lost.
    pub fn loss_rate(&self) -> f64 {
        let lost = (self.dropped() + self.rejected()) as f64;
        let total = self.written() as f64 + lost;
        if total == 0.0 {
            0.0
        } else {
            (lost / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.submitted.store(0, Ordering::Relaxed);
        self.written.store(0, Ordering::Relaxed);
        self.dropped.store(0, Ordering::Relaxed);
        self.rejected.store(0, Ordering::Relaxed);
        self.queue_full_events.store(0, Ordering::Relaxed);
        self.rotations.store(0, Ordering::Relaxed);
    }
}

impl Default for SinkMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SinkMetrics {
    /// Snapshot of the current values
    fn clone(&self) -> Self {
        Self {
            submitted: AtomicU64::new(self.submitted()),
            written: AtomicU64::new(self.written()),
            dropped: AtomicU64::new(self.dropped()),
            rejected: AtomicU64::new(self.rejected()),
            queue_full_events: AtomicU64::new(self.queue_full_events()),
            rotations: AtomicU64::new(self.rotations()),
        }
    }
}
