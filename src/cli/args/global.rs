//! Global CLI options shared across all commands
//!
//! Collects the global flags once so handlers take a single parameter.

use crate::cli::{Cli, OutputFormat};
use crate::config::DEFAULT_ORIGIN;

/// Global CLI options passed to all command handlers.
///
/// Precedence is CLI flag > environment variable > config file > default.
/// This struct captures the CLI/env layer; config file values are applied in
/// `CommandContext`.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Output format (pretty, table, json)
    pub format: OutputFormat,

    /// Execution origin override
    pub origin: Option<String>,

    /// Custom config file path (defaults to ~/.vidhub/config.yaml)
    pub config: Option<String>,

    /// Custom local storage path
    pub store: Option<String>,

    /// Keep local storage in memory
    pub ephemeral: bool,

    /// Bypass cache and fetch fresh data from API
    pub no_cache: bool,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            origin: cli.origin.clone(),
            config: cli.config.clone(),
            store: cli.store.clone(),
            ephemeral: cli.ephemeral,
            no_cache: cli.no_cache,
        }
    }

    /// Origin to resolve the configuration for
    pub fn origin_or_default(&self) -> &str {
        self.origin.as_deref().unwrap_or(DEFAULT_ORIGIN)
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    /// Get store path as `Option<&str>`.
    pub fn store_ref(&self) -> Option<&str> {
        self.store.as_deref()
    }
}
