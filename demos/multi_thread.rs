//! Multi-threaded logging example
//!
//! Several worker threads share one sink through cloned handles; the
//! writer thread serializes their lines into the CSV files.
//!
//! Run with: cargo run --example multi_thread

use csv_log_sink::prelude::*;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== CSV Log Sink - Multi-threaded Example ===\n");

    let folder = std::env::temp_dir().join("csv_log_sink_threads");
    let mut sink = CsvLogSink::builder()
        .folder(&folder)
        .tag("WORKER")
        .queue_capacity(1024)
        .overflow_policy(OverflowPolicy::BlockWithTimeout(Duration::from_millis(50)))
        .build()?;

    let workers: Vec<_> = (0..4)
        .map(|id| {
            let handle = sink.handle();
            thread::spawn(move || {
                let tag = format!("T{}", id);
                for i in 0..250 {
                    handle.log_tagged(LogLevel::Debug, &tag, format!("step {}", i));
                }
            })
        })
        .collect();

    for worker in workers {
        if worker.join().is_err() {
            eprintln!("worker thread panicked");
        }
    }

    if !sink.shutdown(Duration::from_secs(10)) {
        eprintln!("Warning: writer did not finish in time");
    }

    let metrics = sink.metrics();
    println!("Submitted: {}", metrics.submitted());
    println!("Written:   {}", metrics.written());
    println!("Rejected:  {}", metrics.rejected());
    println!("Loss rate: {:.2}%", metrics.loss_rate());
    println!("Files in {}", folder.display());

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
