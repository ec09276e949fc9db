//! CSV log sink: submission API and writer lifecycle

use super::{
    appender::Appender,
    config::SinkConfig,
    csv_format::CsvFormatter,
    error::Result,
    log_level::LogLevel,
    log_record::LogRecord,
    metrics::SinkMetrics,
    overflow_policy::OverflowPolicy,
    queue::SubmissionQueue,
    timestamp::{Clock, TimestampFormat},
    worker::WriterWorker,
};
use crate::appenders::{CsvFileAppender, LogFileFamily, RotationState};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default shutdown timeout for sink cleanup (5 seconds)
///
/// Used when the sink is dropped or closed without an explicit timeout.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Cloneable producer side of a sink
///
/// Handles can be sent to any thread. Once the sink has shut down, lines
/// submitted through a handle are dropped silently and counted as rejected.
#[derive(Clone)]
pub struct SinkHandle {
    formatter: Arc<CsvFormatter>,
    queue: SubmissionQueue,
    metrics: Arc<SinkMetrics>,
}

impl SinkHandle {
    /// Format and enqueue one log call; never blocks on file I/O
    pub fn submit(&self, priority: i32, once_only_tag: Option<&str>, message: &str) {
        let line = self.formatter.format(priority, once_only_tag, message);
        self.queue.submit(line);
    }

    /// Enqueue a record captured elsewhere
    pub fn submit_record(&self, record: &LogRecord) {
        self.queue.submit(self.formatter.format_record(record));
    }

    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        self.submit(level.priority(), None, message.as_ref());
    }

    /// Log with a tag that applies to this call only
    pub fn log_tagged(&self, level: LogLevel, tag: &str, message: impl AsRef<str>) {
        self.submit(level.priority(), Some(tag), message.as_ref());
    }

    #[inline]
    pub fn verbose(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Verbose, message);
    }

    #[inline]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn assert(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Assert, message);
    }

    pub fn formatter(&self) -> &CsvFormatter {
        &self.formatter
    }

    pub fn metrics(&self) -> &SinkMetrics {
        &self.metrics
    }
}

/// Single-writer CSV log sink
///
/// Owns the writer thread. Producers call [`submit`](Self::submit) (or use
/// a [`SinkHandle`]) and return immediately; the writer appends each line to
/// the active `<prefix>_<index>.csv` file, rotating when it is full.
///
/// # Example
///
/// ```no_run
/// use csv_log_sink::{CsvLogSink, SinkConfig};
///
/// let sink = CsvLogSink::open(SinkConfig::new("/var/log/app"))?;
/// sink.submit(4, None, "application started");
/// sink.submit(5, Some("NET"), "retrying request");
/// sink.close();
/// # Ok::<(), csv_log_sink::LoggerError>(())
/// ```
pub struct CsvLogSink {
    config: SinkConfig,
    handle: SinkHandle,
    worker: Option<thread::JoinHandle<()>>,
    cancelled: Arc<AtomicBool>,
    rotation_state: Arc<RwLock<RotationState>>,
}

impl CsvLogSink {
    /// Validate `config` and start the writer thread
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for an unusable config, `WorkerSpawn` if the
    /// writer thread cannot be created
    pub fn open(config: SinkConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    /// Start a sink whose writer uses `appender` instead of the CSV files
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open)
    pub fn with_appender<A: Appender + 'static>(config: SinkConfig, appender: A) -> Result<Self> {
        Self::builder().config(config).appender(appender).build()
    }

    #[must_use]
    pub fn builder() -> SinkBuilder {
        SinkBuilder::new()
    }

    fn start(
        config: SinkConfig,
        clock: Clock,
        appender: Option<Box<dyn Appender>>,
    ) -> Result<Self> {
        config.validate()?;

        let metrics = Arc::new(SinkMetrics::new());
        let family = LogFileFamily::new(&config.folder, &config.file_prefix, config.max_bytes);

        let (appender, rotation_state) = match appender {
            Some(appender) => (appender, Arc::new(RwLock::new(family.state(0)))),
            None => {
                let appender = CsvFileAppender::new(family).with_metrics(Arc::clone(&metrics));
                let state = appender.state_handle();
                (Box::new(appender) as Box<dyn Appender>, state)
            }
        };

        let (queue, receiver) = SubmissionQueue::new(
            config.queue_capacity,
            config.overflow_policy,
            Arc::clone(&metrics),
        );
        let cancelled = Arc::new(AtomicBool::new(false));
        let worker = WriterWorker::new(
            appender,
            receiver,
            Arc::clone(&metrics),
            Arc::clone(&cancelled),
        )
        .spawn(format!("csv-log-writer.{}", config.folder.display()))?;

        let formatter = CsvFormatter::new(config.tag.clone())
            .with_timestamp_format(config.timestamp_format.clone())
            .with_clock(clock);

        tracing::debug!(
            folder = %config.folder.display(),
            max_bytes = config.max_bytes,
            "csv log sink opened"
        );

        Ok(Self {
            config,
            handle: SinkHandle {
                formatter: Arc::new(formatter),
                queue,
                metrics,
            },
            worker: Some(worker),
            cancelled,
            rotation_state,
        })
    }

    /// Format and enqueue one log call
    ///
    /// Returns as soon as the line is queued. Lines submitted after
    /// shutdown are dropped without error.
    pub fn submit(&self, priority: i32, once_only_tag: Option<&str>, message: &str) {
        self.handle.submit(priority, once_only_tag, message);
    }

    pub fn submit_record(&self, record: &LogRecord) {
        self.handle.submit_record(record);
    }

    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        self.handle.log(level, message);
    }

    pub fn log_tagged(&self, level: LogLevel, tag: &str, message: impl AsRef<str>) {
        self.handle.log_tagged(level, tag, message);
    }

    #[inline]
    pub fn verbose(&self, message: impl AsRef<str>) {
        self.handle.verbose(message);
    }

    #[inline]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.handle.debug(message);
    }

    #[inline]
    pub fn info(&self, message: impl AsRef<str>) {
        self.handle.info(message);
    }

    #[inline]
    pub fn warn(&self, message: impl AsRef<str>) {
        self.handle.warn(message);
    }

    #[inline]
    pub fn error(&self, message: impl AsRef<str>) {
        self.handle.error(message);
    }

    #[inline]
    pub fn assert(&self, message: impl AsRef<str>) {
        self.handle.assert(message);
    }

    /// A producer handle that can outlive borrows of the sink
    pub fn handle(&self) -> SinkHandle {
        self.handle.clone()
    }

    pub fn config(&self) -> &SinkConfig {
        &self.config
    }

    /// Counters for written, dropped and rejected lines
    ///
    /// # Example
    ///
    /// ```no_run
    /// use csv_log_sink::{CsvLogSink, SinkConfig};
    ///
    /// let sink = CsvLogSink::open(SinkConfig::new("/var/log/app")).unwrap();
    /// sink.info("hello");
    /// let metrics = sink.metrics();
    /// println!("written: {}, lost: {:.2}%", metrics.written(), metrics.loss_rate());
    /// ```
    pub fn metrics(&self) -> &SinkMetrics {
        &self.handle.metrics
    }

    /// Snapshot of the writer's rotation state
    ///
    /// Tracks the built-in CSV appender; a custom appender leaves it at the
    /// initial state.
    pub fn rotation_state(&self) -> RotationState {
        self.rotation_state.read().clone()
    }

    /// Lines queued but not yet taken by the writer
    pub fn queued(&self) -> usize {
        self.handle.queue.len()
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }

    /// Stop the writer after it has written everything queued so far
    ///
    /// # Returns
    ///
    /// `true` if the writer finished within `timeout`, `false` otherwise
    ///
    /// # Example
    ///
    /// ```no_run
    /// use csv_log_sink::{CsvLogSink, SinkConfig};
    /// use std::time::Duration;
    ///
    /// let mut sink = CsvLogSink::open(SinkConfig::new("/var/log/app")).unwrap();
    /// sink.info("Important message");
    ///
    /// if !sink.shutdown(Duration::from_secs(10)) {
    ///     eprintln!("Warning: log writer did not stop in time");
    /// }
    /// ```
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        let Some(worker) = self.worker.take() else {
            return true;
        };

        self.stop_within(worker, timeout)
    }

    /// Stop the writer without writing what is still queued
    ///
    /// The line being written when this is called is completed; everything
    /// behind it is discarded and counted as dropped.
    pub fn abort(&mut self) -> bool {
        let Some(worker) = self.worker.take() else {
            return true;
        };

        self.cancelled.store(true, Ordering::Release);
        // The marker wakes a writer blocked on an empty queue
        self.stop_within(worker, DEFAULT_SHUTDOWN_TIMEOUT)
    }

    /// Shut down with [`DEFAULT_SHUTDOWN_TIMEOUT`] and release the sink
    pub fn close(mut self) -> bool {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT)
    }

    /// Queue the stop marker and join, both within one `timeout`
    fn stop_within(&self, worker: thread::JoinHandle<()>, timeout: Duration) -> bool {
        // `None` when the timeout is too large to represent, i.e. unbounded
        let deadline = Instant::now().checked_add(timeout);

        // A full bounded queue behind a slow writer can eat the whole budget
        if !self.handle.queue.request_shutdown(timeout) && !worker.is_finished() {
            tracing::warn!(
                ?timeout,
                queued = self.handle.queue.len(),
                "could not queue stop marker for log writer within timeout"
            );
        }
        Self::join_until(worker, deadline)
    }

    fn join_until(worker: thread::JoinHandle<()>, deadline: Option<Instant>) -> bool {
        loop {
            if worker.is_finished() {
                if let Err(e) = worker.join() {
                    tracing::error!("log writer thread panicked during shutdown: {:?}", e);
                    return false;
                }
                return true;
            }

            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                tracing::warn!(
                    "log writer thread did not finish within timeout; some lines may be lost"
                );
                return false;
            }

            // Small sleep to avoid busy-waiting
            thread::sleep(Duration::from_millis(5));
        }
    }
}

impl Drop for CsvLogSink {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        }

        let metrics = self.metrics();
        let lost = metrics.dropped() + metrics.rejected();
        if lost > 0 {
            tracing::warn!(
                lost,
                loss_rate = metrics.loss_rate(),
                "csv log sink closed with lost lines"
            );
        }
    }
}

/// Builder for constructing a [`CsvLogSink`] with a fluent API
///
/// # Example
///
/// ```no_run
/// use csv_log_sink::prelude::*;
///
/// let sink = CsvLogSink::builder()
///     .folder("/var/log/app")
///     .max_bytes(64 * 1024)
///     .tag("APP")
///     .timestamp_format(TimestampFormat::Iso8601)
///     .build()?;
/// # Ok::<(), LoggerError>(())
/// ```
pub struct SinkBuilder {
    config: SinkConfig,
    clock: Clock,
    appender: Option<Box<dyn Appender>>,
}

impl SinkBuilder {
    pub fn new() -> Self {
        Self {
            config: SinkConfig::default(),
            clock: Clock::default(),
            appender: None,
        }
    }

    /// Replace every configuration field at once
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: SinkConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.config.folder = folder.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_bytes(mut self, max_bytes: u64) -> Self {
        self.config.max_bytes = max_bytes;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.config.tag = tag.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.file_prefix = prefix.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.config.timestamp_format = format;
        self
    }

    /// Bound the queue; without this the queue is unbounded
    #[must_use = "builder methods return a new value"]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = Some(capacity);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.config.overflow_policy = policy;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appender = Some(Box::new(appender));
        self
    }

    /// # Errors
    ///
    /// Same as [`CsvLogSink::open`]
    pub fn build(self) -> Result<CsvLogSink> {
        CsvLogSink::start(self.config, self.clock, self.appender)
    }
}

impl Default for SinkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
