//! Video listing and cached fetch commands

use colored::Colorize;
use serde_json::json;

use crate::cli::{CommandContext, OutputFormat};
use crate::client::{Credentials, RequestOptions};
use crate::error::Result;
use crate::output::{self, table};
use crate::session::status_error;
use crate::videos::{self, VIDEO_LIST_CACHE_ID, Video};

/// List videos, one page at a time
pub async fn list(
    ctx: &CommandContext,
    page: usize,
    page_size: Option<usize>,
    all_formats: bool,
) -> Result<()> {
    if ctx.no_cache {
        ctx.cache.invalidate(VIDEO_LIST_CACHE_ID);
    }

    let fetcher = ctx.cache.make_cached_fetcher(VIDEO_LIST_CACHE_ID, None);
    let mut all = videos::list_videos(&ctx.config, &fetcher).await?;
    if !all_formats {
        all = videos::filter_supported(all, &ctx.config);
    }

    let page = videos::paginate(&all, page, page_size, &ctx.config);

    match ctx.format {
        OutputFormat::Json => {
            let items: Vec<_> = page
                .items
                .iter()
                .map(|v| {
                    json!({
                        "filename": v.filename,
                        "path": v.path,
                        "url": videos::play_url(&ctx.config, v),
                    })
                })
                .collect();
            output::print_json(&json!({
                "videos": items,
                "page": page.page,
                "page_size": page.page_size,
                "total_items": page.total_items,
                "total_pages": page.total_pages,
            }))
        }
        OutputFormat::Table => {
            println!("{}", table::format_table::<Video>(&page.items, "No videos found."));
            Ok(())
        }
        OutputFormat::Pretty => {
            if page.items.is_empty() {
                println!("No videos found.");
                return Ok(());
            }
            for video in &page.items {
                println!(
                    "{}  {}",
                    video.filename.bold(),
                    videos::play_url(&ctx.config, video).dimmed()
                );
            }
            println!(
                "\n{}",
                format!(
                    "Page {} of {} ({} videos)",
                    page.page,
                    page.total_pages.max(1),
                    page.total_items
                )
                .dimmed()
            );
            Ok(())
        }
    }
}

/// Fetch a JSON URL through the cache and print the body
pub async fn fetch(ctx: &CommandContext, identifier: &str, url: &str, long: bool) -> Result<()> {
    if ctx.no_cache {
        ctx.cache.invalidate(identifier);
    }

    let duration = long.then_some(ctx.cache.settings().file_duration);
    let fetcher = ctx.cache.make_cached_fetcher(identifier, duration);

    let url = if url.starts_with('/') {
        ctx.config.api_url(url)
    } else {
        url.to_string()
    };
    let options = RequestOptions::get().with_credentials(Credentials::Include);
    let response = fetcher.fetch(&url, &options).await?;

    if !response.ok() {
        return Err(status_error(&response).into());
    }

    match response.json() {
        Ok(body) => println!("{}", serde_json::to_string_pretty(&body)?),
        Err(_) => println!("{}", response.text()),
    }
    Ok(())
}
