//! Writer thread
//!
//! The only place where log files are touched. Lines are handled strictly
//! one at a time in queue order; a failure on one line is counted and
//! reported, then the loop moves on to the next.

use super::appender::Appender;
use super::error::{LoggerError, Result};
use super::metrics::SinkMetrics;
use super::queue::{Command, QueueReceiver};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

pub struct WriterWorker {
    appender: Box<dyn Appender>,
    receiver: QueueReceiver,
    metrics: Arc<SinkMetrics>,
    cancelled: Arc<AtomicBool>,
}

impl WriterWorker {
    pub fn new(
        appender: Box<dyn Appender>,
        receiver: QueueReceiver,
        metrics: Arc<SinkMetrics>,
        cancelled: Arc<AtomicBool>,
    ) -> Self {
        Self {
            appender,
            receiver,
            metrics,
            cancelled,
        }
    }

    /// Run the loop on a dedicated, named thread
    ///
    /// # Errors
    ///
    /// Returns `WorkerSpawn` if the OS refuses to create the thread
    pub fn spawn(self, name: String) -> Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(name)
            .spawn(move || self.run())
            .map_err(|e| LoggerError::WorkerSpawn(e.to_string()))
    }

    /// Consume the queue until shutdown, abort, or every producer is gone
    pub fn run(mut self) {
        while let Ok(command) = self.receiver.recv() {
            if self.cancelled.load(Ordering::Acquire) {
                if matches!(command, Command::Write(_)) {
                    self.metrics.record_dropped();
                }
                break;
            }
            match command {
                Command::Write(line) => self.write_line(&line),
                Command::Shutdown => break,
            }
        }

        let Self {
            appender,
            receiver,
            metrics,
            ..
        } = self;
        let discarded = receiver.close();
        if discarded > 0 {
            for _ in 0..discarded {
                metrics.record_dropped();
            }
            tracing::warn!(
                discarded,
                appender = appender.name(),
                "writer stopped with lines still queued"
            );
        }
    }

    fn write_line(&mut self, line: &str) {
        let appender = &mut self.appender;
        let result = panic::catch_unwind(AssertUnwindSafe(|| appender.append(line)));

        match result {
            Ok(Ok(())) => {
                self.metrics.record_written();
            }
            Ok(Err(e)) => {
                self.metrics.record_dropped();
                tracing::warn!(
                    appender = self.appender.name(),
                    error = %e,
                    "failed to write log line"
                );
            }
            Err(panic_info) => {
                self.metrics.record_dropped();
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                tracing::error!(
                    appender = self.appender.name(),
                    panic = %panic_msg,
                    "appender panicked; continuing with next line"
                );
            }
        }
    }
}
