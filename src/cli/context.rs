//! Command execution context
//!
//! Builds the shared pieces every command needs: the configuration, the local
//! store, the transport and the response cache.

use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::ResponseCache;
use crate::cli::{GlobalOptions, OutputFormat};
use crate::client::{HttpTransport, SessionCookies, Transport};
use crate::config::Config;
use crate::error::Result;
use crate::router::{NavigationGuard, RemoteAuthCheck, Router};
use crate::session::{LoginFlag, SessionClient};
use crate::store::{KeyValueStore, MemoryStore, SqliteStore};

/// Where local storage lives for this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    File(PathBuf),
}

/// Context for command execution.
///
/// Holds:
/// - The resolved, read-only configuration
/// - The key-value store shared by the cache and the login flag
/// - The HTTP transport carrying the session cookies
/// - Output format preference
pub struct CommandContext {
    pub config: Arc<Config>,
    pub store: Arc<dyn KeyValueStore>,
    pub store_location: StoreLocation,
    pub transport: Arc<dyn Transport>,
    pub cookies: SessionCookies,
    pub cache: ResponseCache,
    pub format: OutputFormat,
    pub no_cache: bool,
}

impl CommandContext {
    /// Create a context from the global options.
    ///
    /// A store that cannot be opened falls back to memory, so commands keep
    /// working and simply go to the network every time.
    ///
    /// # Errors
    /// Returns error if the configuration cannot be loaded or the HTTP
    /// client cannot be built.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Arc::new(Config::load(opts.origin_or_default(), opts.config_ref())?);
        let (store, store_location) = open_store(opts);

        let cookies = SessionCookies::new(store.clone());
        let transport: Arc<dyn Transport> =
            Arc::new(HttpTransport::new(&config.origin, cookies.clone())?);
        let cache = ResponseCache::new(store.clone(), transport.clone(), config.cache.clone());

        Ok(Self {
            config,
            store,
            store_location,
            transport,
            cookies,
            cache,
            format: opts.format,
            no_cache: opts.no_cache,
        })
    }

    pub fn login_flag(&self) -> LoginFlag {
        LoginFlag::new(self.store.clone())
    }

    /// Router guarded by the remote `/check_auth` endpoint
    pub fn router(&self) -> Router {
        let auth = RemoteAuthCheck::new(self.transport.clone(), self.config.api_url("/check_auth"));
        Router::new(NavigationGuard::new(self.login_flag(), Arc::new(auth)))
    }

    pub fn session(&self) -> SessionClient {
        SessionClient::new(self.config.clone(), self.transport.clone(), self.login_flag())
            .with_cookies(self.cookies.clone())
    }
}

fn open_store(opts: &GlobalOptions) -> (Arc<dyn KeyValueStore>, StoreLocation) {
    if opts.ephemeral {
        return (Arc::new(MemoryStore::new()), StoreLocation::Memory);
    }

    let opened = match opts.store_ref() {
        Some(path) => SqliteStore::open_at(&PathBuf::from(path)),
        None => SqliteStore::open(),
    };

    match opened {
        Ok(store) => {
            let location = StoreLocation::File(store.path().to_path_buf());
            (Arc::new(store), location)
        }
        Err(e) => {
            log::warn!("Local storage unavailable, using memory: {}", e);
            (Arc::new(MemoryStore::new()), StoreLocation::Memory)
        }
    }
}
