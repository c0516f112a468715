//! Configuration store for vidhub
//!
//! The configuration is resolved once at startup from the execution origin
//! plus an optional YAML overrides file, and is read-only afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Namespace prefix for every cache entry in the key-value store
pub const CACHE_PREFIX: &str = "video_platform_cache_";

/// Origins containing this marker are served behind the reverse proxy
pub const DEPLOYMENT_PORT_MARKER: &str = "8888";

/// Backend URL used outside the proxied deployment
pub const DEV_API_BASE_URL: &str = "http://localhost:5001";

/// Origin assumed when none is given (the front-end dev server)
pub const DEFAULT_ORIGIN: &str = "http://localhost:5173";

/// File suffixes accepted as playable video
pub const SUPPORTED_VIDEO_FORMATS: &[&str] = &[
    ".mp4", ".webm", ".ogg", ".mov", ".rm", ".rmvb", ".wmv", ".avi", ".3gp", ".mkv",
];

/// Resolve the API base URL for an execution origin.
///
/// Returns an empty string inside the proxied deployment, where callers build
/// origin-relative paths, and the development backend URL otherwise.
pub fn resolve_api_base_url(origin: &str) -> String {
    if origin.contains(DEPLOYMENT_PORT_MARKER) {
        String::new()
    } else {
        DEV_API_BASE_URL.to_string()
    }
}

/// Video preload strategy for hover previews
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreloadStrategy {
    #[default]
    None,
    Metadata,
    Auto,
}

impl fmt::Display for PreloadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PreloadStrategy::None => "none",
            PreloadStrategy::Metadata => "metadata",
            PreloadStrategy::Auto => "auto",
        };
        f.write_str(s)
    }
}

/// Cache durations and key namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Validity window for list-type resources
    pub list_duration: Duration,
    /// Validity window for resolved media resources
    pub file_duration: Duration,
    pub prefix: &'static str,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            list_duration: Duration::from_secs(60 * 60), // 1 hr
            file_duration: Duration::from_secs(24 * 60 * 60), // 24 hr
            prefix: CACHE_PREFIX,
        }
    }
}

/// Page size limits for video listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationSettings {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 50,
        }
    }
}

/// Hover preview behaviour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSettings {
    pub hover_delay: Duration,
    pub preload_strategy: PreloadStrategy,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            hover_delay: Duration::from_millis(500),
            preload_strategy: PreloadStrategy::None,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Origin the client runs under
    pub origin: String,
    /// Base URL for backend calls; empty means origin-relative
    pub api_base_url: String,
    pub cache: CacheSettings,
    pub pagination: PaginationSettings,
    pub preview: PreviewSettings,
    pub supported_video_formats: &'static [&'static str],
}

/// Optional values read from the overrides file
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigOverrides {
    api_base_url: Option<String>,
    cache: CacheOverrides,
    pagination: PaginationOverrides,
    preview: PreviewOverrides,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CacheOverrides {
    list_duration_ms: Option<u64>,
    file_duration_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PaginationOverrides {
    default_page_size: Option<usize>,
    max_page_size: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PreviewOverrides {
    hover_delay_ms: Option<u64>,
    preload_strategy: Option<PreloadStrategy>,
}

impl Config {
    /// Default configuration for an execution origin
    pub fn for_origin(origin: &str) -> Self {
        Self {
            origin: origin.trim_end_matches('/').to_string(),
            api_base_url: resolve_api_base_url(origin),
            cache: CacheSettings::default(),
            pagination: PaginationSettings::default(),
            preview: PreviewSettings::default(),
            supported_video_formats: SUPPORTED_VIDEO_FORMATS,
        }
    }

    /// Get the default overrides file path (~/.vidhub/config.yaml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".vidhub").join("config.yaml"))
    }

    /// Load configuration for an origin, applying an overrides file.
    ///
    /// An explicitly named file must exist. The default file is optional.
    pub fn load(origin: &str, path: Option<&str>) -> Result<Self> {
        let path = match path {
            Some(p) => {
                let path = PathBuf::from(p);
                if !path.exists() {
                    return Err(ConfigError::NotFound(p.to_string()).into());
                }
                Some(path)
            }
            None => Self::default_path().filter(|p| p.exists()),
        };

        let mut config = Self::for_origin(origin);
        if let Some(path) = path {
            log::debug!("Loading configuration overrides from {}", path.display());
            let contents = std::fs::read_to_string(&path)?;
            config.apply_yaml(&contents)?;
        }
        Ok(config)
    }

    /// Apply YAML overrides and validate the result
    fn apply_yaml(&mut self, contents: &str) -> Result<()> {
        let overrides: ConfigOverrides = if contents.trim().is_empty() {
            ConfigOverrides::default()
        } else {
            serde_yaml::from_str(contents).map_err(ConfigError::from)?
        };

        if let Some(url) = overrides.api_base_url {
            self.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(ms) = overrides.cache.list_duration_ms {
            self.cache.list_duration = Duration::from_millis(ms);
        }
        if let Some(ms) = overrides.cache.file_duration_ms {
            self.cache.file_duration = Duration::from_millis(ms);
        }
        if let Some(size) = overrides.pagination.default_page_size {
            self.pagination.default_page_size = size;
        }
        if let Some(size) = overrides.pagination.max_page_size {
            self.pagination.max_page_size = size;
        }
        if let Some(ms) = overrides.preview.hover_delay_ms {
            self.preview.hover_delay = Duration::from_millis(ms);
        }
        if let Some(strategy) = overrides.preview.preload_strategy {
            self.preview.preload_strategy = strategy;
        }

        self.validate()
    }

    /// Check the invariants between settings
    pub fn validate(&self) -> Result<()> {
        if self.cache.list_duration.is_zero() || self.cache.file_duration.is_zero() {
            return Err(ConfigError::Invalid("cache durations must be positive".to_string()).into());
        }
        // Cache stats report the list duration in whole minutes
        if self.cache.list_duration.as_millis() % 60_000 != 0 {
            return Err(ConfigError::Invalid(format!(
                "list cache duration must be a whole number of minutes, got {} ms",
                self.cache.list_duration.as_millis()
            ))
            .into());
        }
        if self.pagination.default_page_size == 0 || self.pagination.max_page_size == 0 {
            return Err(ConfigError::Invalid("page sizes must be positive".to_string()).into());
        }
        if self.pagination.default_page_size > self.pagination.max_page_size {
            return Err(ConfigError::Invalid(format!(
                "default page size {} exceeds maximum {}",
                self.pagination.default_page_size, self.pagination.max_page_size
            ))
            .into());
        }
        Ok(())
    }

    /// Build a backend URL from an absolute path.
    ///
    /// With an empty base URL the result stays origin-relative.
    pub fn api_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_base_url, path)
        } else {
            format!("{}/{}", self.api_base_url, path)
        }
    }

    /// Whether a filename carries a supported video extension
    pub fn is_supported_video(&self, filename: &str) -> bool {
        let lower = filename.to_lowercase();
        self.supported_video_formats
            .iter()
            .any(|ext| lower.ends_with(ext))
    }

    /// Resolve a requested page size against the configured limits
    pub fn clamp_page_size(&self, requested: Option<usize>) -> usize {
        match requested {
            None => self.pagination.default_page_size,
            Some(n) => n.clamp(1, self.pagination.max_page_size),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::for_origin(DEFAULT_ORIGIN)
    }
}
