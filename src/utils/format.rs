//! Human-readable sizes and throughput for transfer logs.

use std::time::Duration;

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Formats a byte count as B, KB, MB or GB with two decimals.
pub fn format_bytes(bytes: u64) -> String {
    let b = bytes as f64;
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if b < MIB {
        format!("{:.2} KB", b / KIB)
    } else if b < GIB {
        format!("{:.2} MB", b / MIB)
    } else {
        format!("{:.2} GB", b / GIB)
    }
}

/// Throughput in MB/s; elapsed time is floored at one millisecond.
pub fn throughput_mb_per_sec(bytes: u64, elapsed: Duration) -> f64 {
    let secs = (elapsed.as_millis() as f64 / 1000.0).max(0.001);
    bytes as f64 / MIB / secs
}
