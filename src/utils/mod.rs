//! Common utilities and helpers

/// Display helpers for clip listings
pub struct Utils;

impl Utils {
    /// Size in kilobytes with one decimal place
    pub fn format_size_kb(size: u64) -> String {
        format!("{:.1} KB", size as f64 / 1024.0)
    }

    /// Seconds with millisecond precision, trailing zeros dropped
    pub fn format_seconds(seconds: f64) -> String {
        let text = format!("{:.3}", seconds);
        let text = text.trim_end_matches('0').trim_end_matches('.');
        format!("{}s", text)
    }
}
