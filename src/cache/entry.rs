//! Cache entries, namespaced keys and the clock they are checked against

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Build the store key for a caller-supplied identifier
pub fn namespaced_key(prefix: &str, identifier: &str) -> String {
    format!("{}{}", prefix, identifier)
}

/// Stored form of a cached response.
///
/// The validity window is not stored; each reader decides it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Write time in milliseconds since the Unix epoch
    pub timestamp: i64,
    pub content: Value,
}

impl CacheEntry {
    pub fn new(content: Value, now_ms: i64) -> Self {
        Self {
            timestamp: now_ms,
            content,
        }
    }

    /// Whether the entry is still fresh under `duration`
    pub fn is_valid(&self, now_ms: i64, duration: Duration) -> bool {
        let window = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
        now_ms.saturating_sub(self.timestamp) < window
    }
}

/// Source of the current time, in milliseconds since the Unix epoch
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Hand-driven clock for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ManualClock(std::sync::atomic::AtomicI64);

#[cfg(test)]
impl ManualClock {
    pub fn at(now_ms: i64) -> Self {
        Self(std::sync::atomic::AtomicI64::new(now_ms))
    }

    pub fn advance(&self, by: Duration) {
        self.0.fetch_add(
            by.as_millis() as i64,
            std::sync::atomic::Ordering::SeqCst,
        );
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.0.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_namespaced_key() {
        assert_eq!(
            namespaced_key("video_platform_cache_", "videos"),
            "video_platform_cache_videos"
        );
    }

    #[test]
    fn test_entry_validity_window() {
        let entry = CacheEntry::new(json!([1, 2]), 1_000);
        let hour = Duration::from_secs(3600);

        assert!(entry.is_valid(1_000, hour));
        assert!(entry.is_valid(1_000 + 3_599_999, hour));
        // The window is half-open: exactly `duration` old is stale
        assert!(!entry.is_valid(1_000 + 3_600_000, hour));
    }

    #[test]
    fn test_entry_validity_depends_on_reader_duration() {
        let entry = CacheEntry::new(json!("x"), 0);
        let two_hours = 2 * 3_600_000;

        assert!(!entry.is_valid(two_hours, Duration::from_secs(3600)));
        assert!(entry.is_valid(two_hours, Duration::from_secs(24 * 3600)));
    }

    #[test]
    fn test_entry_wire_format() {
        let entry: CacheEntry =
            serde_json::from_str(r#"{"timestamp":1700000000000,"content":{"videos":[]}}"#)
                .unwrap();
        assert_eq!(entry.timestamp, 1_700_000_000_000);
        assert_eq!(entry.content, json!({"videos": []}));
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::at(10);
        clock.advance(Duration::from_millis(5));
        assert_eq!(clock.now_ms(), 15);
    }
}
