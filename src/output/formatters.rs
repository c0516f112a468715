//! Reusable formatting utilities for CLI output

use std::time::Duration;

/// Render a duration with the largest whole unit that fits.
///
/// # Example output
/// `24 hr`, `60 min`, `500 ms`
pub fn format_duration(duration: Duration) -> String {
    let ms = duration.as_millis();
    if ms == 0 {
        return "0 ms".to_string();
    }
    if ms % 3_600_000 == 0 && ms >= 3_600_000 * 24 {
        return format!("{} hr", ms / 3_600_000);
    }
    if ms % 60_000 == 0 {
        return format!("{} min", ms / 60_000);
    }
    if ms % 1000 == 0 {
        return format!("{} s", ms / 1000);
    }
    format!("{} ms", ms)
}

/// Format a size given in kilobytes
pub fn format_kilobytes(kb: usize) -> String {
    if kb >= 1024 {
        format!("{:.2} MB", kb as f64 / 1024.0)
    } else {
        format!("{} KB", kb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(24 * 3600)), "24 hr");
        assert_eq!(format_duration(Duration::from_secs(3600)), "60 min");
        assert_eq!(format_duration(Duration::from_secs(90)), "90 s");
        assert_eq!(format_duration(Duration::from_millis(500)), "500 ms");
        assert_eq!(format_duration(Duration::ZERO), "0 ms");
    }

    #[test]
    fn test_format_kilobytes() {
        assert_eq!(format_kilobytes(0), "0 KB");
        assert_eq!(format_kilobytes(512), "512 KB");
        assert_eq!(format_kilobytes(2048), "2.00 MB");
    }
}
