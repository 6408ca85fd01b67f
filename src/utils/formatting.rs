use chrono::{DateTime, Utc};

/// Timestamp layout used in filters and exported cells.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

/// Render an optional UTC timestamp; absent values become an empty cell.
pub fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

/// Arithmetic mean with two decimals; an empty set averages to zero.
pub fn format_mean(sum: usize, count: usize) -> String {
    if count == 0 {
        return "0.00".to_string();
    }
    format!("{:.2}", sum as f64 / count as f64)
}
