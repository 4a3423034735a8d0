//! Human readable byte counts.

const UNIT: f64 = 1024.0;

/// Formats a byte count using the largest binary unit it reaches.
///
/// Values are rounded to two decimals and printed without trailing zeros.
///
/// ```
/// use haul::utils::format_size;
///
/// assert_eq!(format_size(0), "0 Bytes");
/// assert_eq!(format_size(1536), "1.5 KB");
/// assert_eq!(format_size(2 * 1024 * 1024), "2 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    let value = bytes as f64;
    if value >= UNIT.powi(3) {
        format!("{} GB", round2(value / UNIT.powi(3)))
    } else if value >= UNIT.powi(2) {
        format!("{} MB", round2(value / UNIT.powi(2)))
    } else if value >= UNIT {
        format!("{} KB", round2(value / UNIT))
    } else {
        format!("{} Bytes", bytes)
    }
}

/// Formats a throughput figure, e.g. `"1.5 KB/s"`.
///
/// Returns `None` while no speed has been measured yet.
pub fn format_speed(bytes_per_second: u64) -> Option<String> {
    (bytes_per_second != 0).then(|| format!("{}/s", format_size(bytes_per_second)))
}

/// Rounds to two decimals, halves going to the even neighbour.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
