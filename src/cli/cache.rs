//! Cache management commands

use colored::Colorize;
use serde_json::json;

use crate::cli::context::StoreLocation;
use crate::cli::{CommandContext, OutputFormat};
use crate::error::Result;
use crate::output::{self, formatters::format_kilobytes};

fn location(ctx: &CommandContext) -> String {
    match ctx.store_location {
        StoreLocation::Memory => "(memory)".to_string(),
        StoreLocation::File(ref path) => path.display().to_string(),
    }
}

/// Show cache statistics
pub fn status(ctx: &CommandContext) -> Result<()> {
    let stats = ctx.cache.stats();

    match ctx.format {
        OutputFormat::Json => output::print_json(&json!({
            "total_keys": stats.total_keys,
            "valid_keys": stats.valid_keys,
            "expired_keys": stats.total_keys - stats.valid_keys,
            "total_size": stats.total_size,
            "max_age": stats.max_age,
            "path": location(ctx),
        })),
        _ => {
            println!("{}", "Cache Status".bold());
            println!("────────────────────────────────────────");
            println!("Location:       {}", location(ctx));
            println!("Entries:        {}", stats.total_keys);
            println!("Valid entries:  {}", stats.valid_keys.to_string().green());
            println!("Expired:        {}", stats.total_keys - stats.valid_keys);
            println!("Total size:     {}", format_kilobytes(stats.total_size));
            println!("Max age:        {} min", stats.max_age);
            Ok(())
        }
    }
}

/// Remove cached entries matching `pattern` (all when empty)
pub fn clear(ctx: &CommandContext, pattern: &str) -> Result<()> {
    let removed = ctx.cache.clear(pattern);

    match ctx.format {
        OutputFormat::Json => output::print_json(&json!({
            "entries_removed": removed,
            "pattern": pattern,
        })),
        _ => {
            if removed > 0 {
                println!("Cleared {} cache entries", removed);
            } else if pattern.is_empty() {
                println!("Cache was already empty");
            } else {
                println!("No cache entries match '{}'", pattern);
            }
            Ok(())
        }
    }
}

/// Show the local storage location
pub fn path(ctx: &CommandContext) -> Result<()> {
    println!("{}", location(ctx));
    Ok(())
}
