//! File rotation example
//!
//! Uses a small size threshold so a few hundred lines spread over several
//! `logs_<n>.csv` files.
//!
//! Run with: cargo run --example file_rotation

use csv_log_sink::prelude::*;
use std::fs;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("=== CSV Log Sink - File Rotation Example ===\n");

    let folder = std::env::temp_dir().join("csv_log_sink_rotation");
    let config = SinkConfig::new(&folder)
        .with_max_bytes(2 * 1024)
        .with_tag("ROTATE")
        .with_timestamp_format(TimestampFormat::Iso8601);
    let mut sink = CsvLogSink::open(config)?;

    for i in 0..200 {
        sink.info(format!("Rotating message {}", i));
    }
    sink.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

    let state = sink.rotation_state();
    println!("Active file index: {}", state.current_file_index);
    println!("Rotations: {}", sink.metrics().rotations());

    let family = LogFileFamily::new(&folder, "logs", state.max_bytes);
    for path in family.existing_files() {
        let size = fs::metadata(&path)?.len();
        println!("  {} ({} bytes)", path.display(), size);
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
