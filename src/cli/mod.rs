//! CLI command definitions and handlers

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod auth;
pub mod cache;
pub mod config;
pub mod context;
pub mod navigate;
pub mod videos;

pub use args::{GlobalOptions, OutputFormat};
pub use context::CommandContext;

/// vidhub - command-line client for the video platform
#[derive(Parser, Debug)]
#[command(name = "vidhub")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "VIDHUB_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Origin the client runs under (selects the API base URL)
    #[arg(long, global = true, env = "VIDHUB_ORIGIN", hide_env = true)]
    pub origin: Option<String>,

    /// Override config file location
    #[arg(long, global = true, env = "VIDHUB_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Override local storage database location
    #[arg(long, global = true, env = "VIDHUB_STORE", hide_env = true)]
    pub store: Option<String>,

    /// Keep local storage in memory for this run only
    #[arg(long, global = true, conflicts_with = "store")]
    pub ephemeral: bool,

    /// Enable debug logging
    #[arg(long, global = true, env = "VIDHUB_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Bypass cache, fetch fresh data from API
    #[arg(long, global = true, env = "VIDHUB_NO_CACHE", hide_env = true)]
    pub no_cache: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the resolved client configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// List the application's routes
    Routes,

    /// Navigate to a route through the authorization guard
    Navigate {
        /// Route path, e.g. `/upload` or `#/upload`
        path: String,
    },

    /// Log in to the video platform
    Login {
        /// Account name (prompted if omitted)
        #[arg(long, short = 'u')]
        username: Option<String>,

        /// Password (prompted if omitted)
        #[arg(long, env = "VIDHUB_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// End the session and forget the local login
    Logout,

    /// Create an account (requires admin approval)
    Register {
        /// Account name (prompted if omitted)
        #[arg(long, short = 'u')]
        username: Option<String>,

        /// Password (prompted if omitted)
        #[arg(long, env = "VIDHUB_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Show the logged-in user
    Whoami,

    /// Browse videos
    #[command(subcommand)]
    Videos(VideoCommands),

    /// Fetch a JSON URL through the response cache
    Fetch {
        /// Cache identifier (stored as `video_platform_cache_<identifier>`)
        identifier: String,

        /// URL or API path to fetch
        url: String,

        /// Use the long (media) cache duration
        #[arg(long)]
        long: bool,
    },

    /// Manage local response cache
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Generate shell completions
    #[command(after_help = "\
Examples:
  bash:   vidhub completion bash > /etc/bash_completion.d/vidhub
  zsh:    vidhub completion zsh > \"${fpath[1]}/_vidhub\"
  fish:   vidhub completion fish > ~/.config/fish/completions/vidhub.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the configuration in effect
    Show,
}

/// Video subcommands
#[derive(Subcommand, Debug)]
pub enum VideoCommands {
    /// List uploaded videos
    List {
        /// Page number (1-indexed)
        #[arg(long, short = 'p', default_value_t = 1)]
        page: usize,

        /// Results per page (capped at the configured maximum)
        #[arg(long, short = 'n')]
        page_size: Option<usize>,

        /// Include files without a supported video extension
        #[arg(long)]
        all_formats: bool,
    },
}

/// Cache management subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache statistics
    Status,

    /// Remove cached entries
    Clear {
        /// Only remove entries whose key contains this text
        #[arg(default_value = "")]
        pattern: String,
    },

    /// Show the local storage location
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_navigate_with_globals() {
        let cli = Cli::try_parse_from(["vidhub", "navigate", "/upload", "--ephemeral"]).unwrap();
        assert!(cli.ephemeral);
        match cli.command {
            Commands::Navigate { path } => assert_eq!(path, "/upload"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_cache_clear_default_pattern() {
        let cli = Cli::try_parse_from(["vidhub", "cache", "clear"]).unwrap();
        match cli.command {
            Commands::Cache(CacheCommands::Clear { pattern }) => assert!(pattern.is_empty()),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_store_conflicts_with_ephemeral() {
        let result =
            Cli::try_parse_from(["vidhub", "routes", "--ephemeral", "--store", "/tmp/x.db"]);
        assert!(result.is_err());
    }
}
