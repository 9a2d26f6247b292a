//! Byte and duration formatting shared by the observers and report output

use std::time::Duration;

const KIB: f64 = 1024.0;
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Bytes expressed in kilobytes (1024-based)
pub fn kilobytes(bytes: u64) -> f64 {
    bytes as f64 / KIB
}

/// Bytes expressed in gigabytes (1024-based)
pub fn gigabytes(bytes: u64) -> f64 {
    bytes as f64 / GIB
}

/// Signed byte difference expressed in kilobytes
pub fn signed_kilobytes(delta: i64) -> f64 {
    delta as f64 / KIB
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", size as u64, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

/// Format an elapsed time as `"<s> seconds (<m> minutes and <s> seconds)"`
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs_f64();
    let minutes = (total / 60.0).floor() as u64;
    let seconds = total - (minutes as f64 * 60.0);
    format!("{total:.2} seconds ({minutes} minutes and {seconds:.2} seconds)")
}
