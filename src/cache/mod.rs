//! Local cache for API responses
//!
//! Entries live in the shared key-value store under the
//! `video_platform_cache_` namespace as `{timestamp, content}` JSON records.

pub mod entry;
pub mod fetch;
pub mod manage;

use std::sync::Arc;
use std::time::Duration;

use crate::client::Transport;
use crate::config::CacheSettings;
use crate::store::KeyValueStore;

use entry::namespaced_key;
pub use entry::{CacheEntry, Clock, SystemClock};
pub use fetch::CachedFetcher;
pub use manage::CacheStats;

/// Cache handle shared by every call site.
///
/// Bundles the store, transport, clock and settings so cached fetchers and
/// the management utilities agree on the namespace.
#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn KeyValueStore>,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    settings: CacheSettings,
}

impl ResponseCache {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        transport: Arc<dyn Transport>,
        settings: CacheSettings,
    ) -> Self {
        Self {
            store,
            transport,
            clock: Arc::new(SystemClock),
            settings,
        }
    }

    /// Replace the clock (tests)
    #[cfg(test)]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Cached fetch bound to `identifier`.
    ///
    /// `duration` defaults to the list duration.
    pub fn make_cached_fetcher(
        &self,
        identifier: &str,
        duration: Option<Duration>,
    ) -> CachedFetcher {
        CachedFetcher::new(
            self.settings.prefix,
            identifier,
            duration.unwrap_or(self.settings.list_duration),
            self.store.clone(),
            self.transport.clone(),
            self.clock.clone(),
        )
    }

    /// Drop the single entry cached under `identifier`
    pub fn invalidate(&self, identifier: &str) {
        let key = namespaced_key(self.settings.prefix, identifier);
        match self.store.remove(&key) {
            Ok(()) => log::debug!("Invalidated {}", key),
            Err(e) => log::warn!("Cache invalidate error for {}: {}", key, e),
        }
    }

    /// Delete cached entries whose key contains `pattern` (all when empty)
    pub fn clear(&self, pattern: &str) -> usize {
        manage::clear_cache(self.store.as_ref(), self.settings.prefix, pattern)
    }

    /// Current cache statistics
    pub fn stats(&self) -> CacheStats {
        manage::cache_stats(
            self.store.as_ref(),
            self.settings.prefix,
            self.settings.list_duration,
            self.clock.now_ms(),
        )
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }
}
