//! Config command implementation

use colored::Colorize;
use serde_json::json;

use crate::cli::{GlobalOptions, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::output::{self, formatters::format_duration};

/// Show the resolved configuration
pub fn show(opts: &GlobalOptions) -> Result<()> {
    let config = Config::load(opts.origin_or_default(), opts.config_ref())?;

    match opts.format {
        OutputFormat::Json => output::print_json(&config_json(&config)),
        _ => {
            let base = if config.api_base_url.is_empty() {
                "(origin-relative)".dimmed().to_string()
            } else {
                config.api_base_url.cyan().to_string()
            };

            println!("{}\n", "vidhub Configuration".bold());
            println!("Origin:            {}", config.origin);
            println!("API base URL:      {}", base);
            println!();
            println!("{}", "Cache".bold());
            println!("  Key prefix:      {}", config.cache.prefix);
            println!("  List duration:   {}", format_duration(config.cache.list_duration));
            println!("  File duration:   {}", format_duration(config.cache.file_duration));
            println!();
            println!("{}", "Pagination".bold());
            println!("  Default size:    {}", config.pagination.default_page_size);
            println!("  Maximum size:    {}", config.pagination.max_page_size);
            println!();
            println!("{}", "Preview".bold());
            println!("  Hover delay:     {}", format_duration(config.preview.hover_delay));
            println!("  Preload:         {}", config.preview.preload_strategy);
            println!();
            println!(
                "Video formats:     {}",
                config.supported_video_formats.join(" ")
            );
            Ok(())
        }
    }
}

fn config_json(config: &Config) -> serde_json::Value {
    json!({
        "origin": config.origin,
        "api_base_url": config.api_base_url,
        "cache": {
            "prefix": config.cache.prefix,
            "list_duration_ms": config.cache.list_duration.as_millis() as u64,
            "file_duration_ms": config.cache.file_duration.as_millis() as u64,
        },
        "pagination": {
            "default_page_size": config.pagination.default_page_size,
            "max_page_size": config.pagination.max_page_size,
        },
        "preview": {
            "hover_delay_ms": config.preview.hover_delay.as_millis() as u64,
            "preload_strategy": config.preview.preload_strategy,
        },
        "supported_video_formats": config.supported_video_formats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_json_shape() {
        let value = config_json(&Config::for_origin("http://videos.lan:8888"));
        assert_eq!(value["api_base_url"], "");
        assert_eq!(value["cache"]["list_duration_ms"], 3_600_000);
        assert_eq!(value["cache"]["prefix"], "video_platform_cache_");
        assert_eq!(value["preview"]["preload_strategy"], "none");
        assert_eq!(value["supported_video_formats"][0], ".mp4");
    }
}
