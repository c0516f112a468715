//! Read-through cached fetch
//!
//! A [`CachedFetcher`] stands in for a plain transport call. Fresh entries are
//! answered from the store without network I/O; misses go to the network and
//! successful JSON bodies are written back. Storage problems are logged and
//! degrade to a miss, they never reach the caller.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use super::entry::{CacheEntry, Clock, namespaced_key};
use crate::client::{FetchResponse, RequestOptions, Transport, merge_headers};
use crate::error::Result;
use crate::store::KeyValueStore;

/// Caching hint sent with every network fetch; caller headers override it
pub const DEFAULT_CACHE_HINT: (&str, &str) = ("Cache-Control", "max-age=3600");

/// Fetch function bound to one cache identifier and validity window
pub struct CachedFetcher {
    identifier: String,
    key: String,
    duration: Duration,
    store: Arc<dyn KeyValueStore>,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
}

impl CachedFetcher {
    pub(crate) fn new(
        prefix: &str,
        identifier: &str,
        duration: Duration,
        store: Arc<dyn KeyValueStore>,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            identifier: identifier.to_string(),
            key: namespaced_key(prefix, identifier),
            duration,
            store,
            transport,
            clock,
        }
    }

    /// Store key this fetcher reads and writes
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Fetch `url`, answering from the cache while the entry is fresh.
    ///
    /// Transport errors propagate unchanged. Unsuccessful responses and
    /// bodies that are not JSON are returned as received and not cached.
    pub async fn fetch(&self, url: &str, options: &RequestOptions) -> Result<FetchResponse> {
        if let Some(content) = self.read_fresh() {
            log::debug!("Cache hit for {}", self.identifier);
            return Ok(FetchResponse::from_json(content));
        }

        let mut request = options.clone();
        request.headers = merge_headers(&[DEFAULT_CACHE_HINT], &options.headers);

        let response = self.transport.fetch(url, &request).await?;
        if !response.ok() {
            return Ok(response);
        }

        match response.json() {
            Ok(content) => {
                self.write(content.clone());
                Ok(FetchResponse::from_json(content))
            }
            Err(e) => {
                log::warn!("Cache write error for {}: {}", self.identifier, e);
                Ok(response)
            }
        }
    }

    /// Content of a fresh entry; a stale entry is removed on the way
    fn read_fresh(&self) -> Option<Value> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Cache read error for {}: {}", self.identifier, e);
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Cache read error for {}: {}", self.identifier, e);
                return None;
            }
        };

        if entry.is_valid(self.clock.now_ms(), self.duration) {
            return Some(entry.content);
        }

        log::debug!("Cache expired for {}", self.identifier);
        if let Err(e) = self.store.remove(&self.key) {
            log::warn!("Cache evict error for {}: {}", self.identifier, e);
        }
        None
    }

    fn write(&self, content: Value) {
        let entry = CacheEntry::new(content, self.clock.now_ms());
        let result = serde_json::to_string(&entry)
            .map_err(|e| e.to_string())
            .and_then(|raw| self.store.set(&self.key, &raw).map_err(|e| e.to_string()));

        match result {
            Ok(()) => log::debug!("Cached response for {}", self.identifier),
            Err(e) => log::warn!("Cache write error for {}: {}", self.identifier, e),
        }
    }
}
