//! Human-facing value formatting.
//!
//! Shared by the renderer's info fields:
//! - [`format_bytes`]: binary-prefix units, largest unit keeping the
//!   value below 1024 (B, KiB, MiB, GiB, TiB, PiB, EiB)
//! - [`format_age`]: process age as `DD:HH:MM:SS`

/// Binary-prefix units, in ascending order.
const UNITS: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// Format a byte count with the largest binary-prefix unit that keeps
/// the value below 1024.
///
/// Values are rendered with two decimals, e.g. `"1.50 KiB"`.
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// Format an age in seconds as `DD:HH:MM:SS`.
///
/// Negative ages (clock skew between snapshot fields) clamp to zero.
/// Day counts above 99 widen the field rather than wrap.
pub fn format_age(age_seconds: i64) -> String {
    let total = age_seconds.max(0);
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}:{:02}", days, hours, minutes, seconds)
}
