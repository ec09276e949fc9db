//! Basic sink usage example
//!
//! Demonstrates opening a sink, logging at each level and with a per-call
//! tag, then shutting down and reading the CSV back.
//!
//! Run with: cargo run --example basic_usage

use csv_log_sink::info;
use csv_log_sink::prelude::*;
use std::fs;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("=== CSV Log Sink - Basic Usage Example ===\n");

    let folder = std::env::temp_dir().join("csv_log_sink_basic");
    let mut sink = CsvLogSink::open(SinkConfig::new(&folder))?;

    println!("1. Logging at different levels:");
    sink.verbose("This is a verbose message");
    sink.debug("This is a debug message");
    sink.info("This is an info message");
    sink.warn("This is a warning message");
    sink.error("This is an error message");
    sink.assert("This is an assert message");

    println!("2. Logging with a tag for one call:");
    sink.log_tagged(LogLevel::Info, "NET", "Connected to upstream");
    sink.submit(5, Some("DB"), "Slow query took 1200 ms");

    println!("3. Logging with the formatting macros:");
    let port = 8080;
    info!(sink, "Server listening on port {}", port);

    sink.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

    let path = folder.join("logs_0.csv");
    println!("\nContents of {}:", path.display());
    print!("{}", fs::read_to_string(&path)?);

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
