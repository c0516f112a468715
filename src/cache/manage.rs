//! Bulk invalidation and statistics over the cache namespace

use serde::Serialize;
use std::time::Duration;

use super::entry::CacheEntry;
use crate::error::StoreError;
use crate::store::KeyValueStore;

/// Delete namespaced keys containing `pattern` (all of them when empty).
///
/// Keys outside the namespace are never touched. Returns how many keys were
/// removed; a storage failure is logged and ends the sweep early.
pub fn clear_cache(store: &dyn KeyValueStore, prefix: &str, pattern: &str) -> usize {
    let keys = match store.keys() {
        Ok(keys) => keys,
        Err(e) => {
            log::error!("Cache clear error: {}", e);
            return 0;
        }
    };

    let mut removed = 0;
    for key in keys
        .iter()
        .filter(|k| k.starts_with(prefix) && (pattern.is_empty() || k.contains(pattern)))
    {
        if let Err(e) = store.remove(key) {
            log::error!("Cache clear error: {}", e);
            break;
        }
        removed += 1;
    }

    log::info!(
        "Cleared cache with pattern: {}",
        if pattern.is_empty() { "all" } else { pattern }
    );
    removed
}

/// Aggregate numbers about the cache namespace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total_keys: usize,
    /// Entries still fresh under the list duration
    pub valid_keys: usize,
    /// Stored size in kilobytes, rounded
    pub total_size: usize,
    /// List duration in minutes
    pub max_age: u64,
}

/// Compute [`CacheStats`]; any storage failure yields all zeros.
///
/// Validity is always judged against `list_duration`, whatever duration the
/// entry was written under.
pub fn cache_stats(
    store: &dyn KeyValueStore,
    prefix: &str,
    list_duration: Duration,
    now_ms: i64,
) -> CacheStats {
    match collect_stats(store, prefix, list_duration, now_ms) {
        Ok(stats) => stats,
        Err(e) => {
            log::error!("Cache stats error: {}", e);
            CacheStats::default()
        }
    }
}

fn collect_stats(
    store: &dyn KeyValueStore,
    prefix: &str,
    list_duration: Duration,
    now_ms: i64,
) -> Result<CacheStats, StoreError> {
    let keys: Vec<String> = store
        .keys()?
        .into_iter()
        .filter(|k| k.starts_with(prefix))
        .collect();

    let mut total_size = 0usize;
    let mut valid_keys = 0usize;

    for key in &keys {
        let Some(value) = store.get(key)? else {
            continue;
        };
        // Sized in UTF-16 code units, like browser storage quotas
        total_size += value.encode_utf16().count();
        if let Ok(entry) = serde_json::from_str::<CacheEntry>(&value)
            && entry.is_valid(now_ms, list_duration)
        {
            valid_keys += 1;
        }
    }

    Ok(CacheStats {
        total_keys: keys.len(),
        valid_keys,
        total_size: (total_size + 512) / 1024,
        max_age: list_duration.as_secs() / 60,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CACHE_PREFIX;
    use crate::store::MemoryStore;
    use serde_json::json;

    const HOUR: Duration = Duration::from_secs(3600);
    const NOW: i64 = 1_700_000_000_000;

    fn entry(age_ms: i64) -> String {
        serde_json::to_string(&CacheEntry::new(json!({"videos": []}), NOW - age_ms)).unwrap()
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.set("video_platform_cache_videos", &entry(0)).unwrap();
        store.set("video_platform_cache_videos_page_2", &entry(0)).unwrap();
        store.set("video_platform_cache_file_a.mp4", &entry(0)).unwrap();
        store.set("user", r#"{"id":1}"#).unwrap();
        store.set("videos_bookmark", "x").unwrap();
        store
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Io("denied".to_string()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io("denied".to_string()))
        }
        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Io("denied".to_string()))
        }
        fn keys(&self) -> Result<Vec<String>, StoreError> {
            Err(StoreError::Io("denied".to_string()))
        }
    }

    #[test]
    fn test_clear_all_namespaced_only() {
        let store = seeded();
        assert_eq!(clear_cache(&store, CACHE_PREFIX, ""), 3);
        assert_eq!(
            store.keys().unwrap(),
            vec!["user".to_string(), "videos_bookmark".to_string()]
        );
    }

    #[test]
    fn test_clear_with_pattern() {
        let store = seeded();
        assert_eq!(clear_cache(&store, CACHE_PREFIX, "page"), 1);
        assert!(store.get("video_platform_cache_videos_page_2").unwrap().is_none());
        assert!(store.get("video_platform_cache_videos").unwrap().is_some());
        assert!(store.get("videos_bookmark").unwrap().is_some());
    }

    #[test]
    fn test_clear_pattern_matches_whole_key() {
        // The pattern is matched against the full key, prefix included
        let store = seeded();
        assert_eq!(clear_cache(&store, CACHE_PREFIX, "platform"), 3);
    }

    #[test]
    fn test_clear_failure_swallowed() {
        assert_eq!(clear_cache(&FailingStore, CACHE_PREFIX, ""), 0);
    }

    #[test]
    fn test_stats_empty_store() {
        let stats = cache_stats(&MemoryStore::new(), CACHE_PREFIX, HOUR, NOW);
        assert_eq!(
            stats,
            CacheStats {
                total_keys: 0,
                valid_keys: 0,
                total_size: 0,
                max_age: 60,
            }
        );
    }

    #[test]
    fn test_stats_counts_valid_and_corrupt() {
        let store = MemoryStore::new();
        store.set("video_platform_cache_fresh", &entry(10 * 60 * 1000)).unwrap();
        store.set("video_platform_cache_stale", &entry(61 * 60 * 1000)).unwrap();
        store.set("video_platform_cache_corrupt", "{oops").unwrap();
        store.set("user", r#"{"id":1}"#).unwrap();

        let stats = cache_stats(&store, CACHE_PREFIX, HOUR, NOW);
        assert_eq!(stats.total_keys, 3);
        assert_eq!(stats.valid_keys, 1);
        assert_eq!(stats.max_age, 60);
    }

    #[test]
    fn test_stats_size_rounds_to_kilobytes() {
        let store = MemoryStore::new();
        store.set("video_platform_cache_a", &"x".repeat(1536)).unwrap();
        assert_eq!(cache_stats(&store, CACHE_PREFIX, HOUR, NOW).total_size, 2);

        store.set("video_platform_cache_a", &"x".repeat(1535)).unwrap();
        assert_eq!(cache_stats(&store, CACHE_PREFIX, HOUR, NOW).total_size, 1);
    }

    #[test]
    fn test_stats_use_list_duration_for_long_lived_entries() {
        // Written for a 24 hr window, reported stale after the 1 hr list window
        let store = MemoryStore::new();
        store.set("video_platform_cache_file_a.mp4", &entry(2 * 3600 * 1000)).unwrap();

        let stats = cache_stats(&store, CACHE_PREFIX, HOUR, NOW);
        assert_eq!(stats.total_keys, 1);
        assert_eq!(stats.valid_keys, 0);
    }

    #[test]
    fn test_stats_failure_zeroed() {
        assert_eq!(
            cache_stats(&FailingStore, CACHE_PREFIX, HOUR, NOW),
            CacheStats::default()
        );
    }
}
