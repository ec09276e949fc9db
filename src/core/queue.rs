//! Submission queue between producer threads and the writer thread
//!
//! A FIFO channel from `crossbeam-channel`: every producer's lines arrive in
//! the order that producer sent them, and the writer sees a single merged
//! order. Sending never fails loudly; a closed queue drops the line and
//! counts it.

use super::error::{LoggerError, Result};
use super::metrics::SinkMetrics;
use super::overflow_policy::OverflowPolicy;
use crossbeam_channel::{
    bounded, unbounded, Receiver, RecvError, SendTimeoutError, Sender, TrySendError,
};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

/// Unit of work for the writer thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A fully formatted CSV line
    Write(String),
    /// Stop after everything queued before this command
    Shutdown,
}

/// Producer side of the queue; cheap to clone
#[derive(Clone)]
pub struct SubmissionQueue {
    sender: Sender<Command>,
    capacity: Option<usize>,
    overflow_policy: OverflowPolicy,
    metrics: Arc<SinkMetrics>,
    // `false` once the writer has closed its end. Producers hold the read
    // lock across a send so closing never races a line into the channel.
    open: Arc<RwLock<bool>>,
}

/// Consumer side of the queue, owned by the writer thread
pub struct QueueReceiver {
    receiver: Receiver<Command>,
    open: Arc<RwLock<bool>>,
}

impl QueueReceiver {
    /// Block until the next command, or fail once every producer is gone
    pub fn recv(&self) -> std::result::Result<Command, RecvError> {
        self.receiver.recv()
    }

    /// Stop accepting lines and return how many were left unwritten
    ///
    /// After this returns every submission is rejected, so each accepted
    /// line is accounted for as either written or dropped.
    pub fn close(self) -> usize {
        let mut discarded = 0;
        // Keep draining so producers blocked on a full bounded queue can
        // finish their send and release the read lock
        let mut open = loop {
            discarded += self.discard_queued();
            if let Some(guard) = self.open.try_write_for(Duration::from_millis(1)) {
                break guard;
            }
        };
        *open = false;
        discarded += self.discard_queued();
        discarded
    }

    fn discard_queued(&self) -> usize {
        self.receiver
            .try_iter()
            .filter(|command| matches!(command, Command::Write(_)))
            .count()
    }
}

impl SubmissionQueue {
    /// Create the queue and the receiver the writer thread consumes
    pub fn new(
        capacity: Option<usize>,
        overflow_policy: OverflowPolicy,
        metrics: Arc<SinkMetrics>,
    ) -> (Self, QueueReceiver) {
        let (sender, receiver) = match capacity {
            Some(size) => bounded(size),
            None => unbounded(),
        };
        let open = Arc::new(RwLock::new(true));
        let queue = Self {
            sender,
            capacity,
            overflow_policy,
            metrics,
            open: Arc::clone(&open),
        };
        (queue, QueueReceiver { receiver, open })
    }

    /// Hand a line to the writer; drops it silently when that is impossible
    pub fn submit(&self, line: String) {
        if let Err(e) = self.try_submit(line) {
            let rejected = self.metrics.record_rejected();
            match e {
                LoggerError::QueueFull { capacity } => self.alert_on_overflow(rejected, capacity),
                _ => tracing::trace!("log line dropped: {}", e),
            }
        }
    }

    /// Like [`submit`](Self::submit) but reports why a line was not queued
    ///
    /// # Errors
    ///
    /// `SinkStopped` once the writer is gone, `QueueFull` when a bounded
    /// queue has no room within the overflow policy
    pub fn try_submit(&self, line: String) -> Result<()> {
        let open = self.open.read();
        if !*open {
            return Err(LoggerError::SinkStopped);
        }
        let command = Command::Write(line);

        let sent = match self.sender.try_send(command) {
            Ok(()) => Ok(()),
            Err(TrySendError::Disconnected(_)) => Err(LoggerError::SinkStopped),
            Err(TrySendError::Full(command)) => {
                self.metrics.record_queue_full();
                self.handle_full(command)
            }
        };

        if sent.is_ok() {
            self.metrics.record_submitted();
        }
        sent
    }

    fn handle_full(&self, command: Command) -> Result<()> {
        let capacity = self.capacity.unwrap_or_default();
        match self.overflow_policy {
            OverflowPolicy::BlockWithTimeout(timeout) => {
                match self.sender.send_timeout(command, timeout) {
                    Ok(()) => Ok(()),
                    Err(SendTimeoutError::Timeout(_)) => Err(LoggerError::QueueFull { capacity }),
                    Err(SendTimeoutError::Disconnected(_)) => Err(LoggerError::SinkStopped),
                }
            }
            OverflowPolicy::DropNewest | OverflowPolicy::AlertAndDrop => {
                Err(LoggerError::QueueFull { capacity })
            }
        }
    }

    fn alert_on_overflow(&self, previously_rejected: u64, capacity: usize) {
        if self.overflow_policy == OverflowPolicy::DropNewest {
            return;
        }
        // First drop, then every thousandth
        if previously_rejected == 0 || (previously_rejected + 1) % 1000 == 0 {
            tracing::warn!(
                rejected = previously_rejected + 1,
                capacity,
                "log queue full, lines dropped; consider a larger queue_capacity"
            );
        }
    }

    /// Ask the writer to stop once it reaches this point in the queue
    ///
    /// Waits at most `timeout` for room in a full bounded queue. Returns
    /// `false` if the marker could not be queued in time or the writer is
    /// already gone.
    pub fn request_shutdown(&self, timeout: Duration) -> bool {
        self.sender.send_timeout(Command::Shutdown, timeout).is_ok()
    }

    /// Lines currently waiting for the writer
    pub fn len(&self) -> usize {
        self.sender.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sender.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}
