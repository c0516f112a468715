//! Video listing helpers

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::cache::CachedFetcher;
use crate::client::{Credentials, RequestOptions};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::session::status_error;

/// Cache identifier of the video list
pub const VIDEO_LIST_CACHE_ID: &str = "videos";

/// A video as listed by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Tabled)]
pub struct Video {
    #[tabled(rename = "FILENAME")]
    pub filename: String,
    #[tabled(rename = "PATH")]
    pub path: String,
}

#[derive(Debug, Deserialize)]
struct VideoList {
    #[serde(default)]
    videos: Vec<Video>,
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Fetch the video list through the cache
pub async fn list_videos(config: &Config, fetcher: &CachedFetcher) -> Result<Vec<Video>> {
    let options = RequestOptions::get().with_credentials(Credentials::Include);
    let response = fetcher.fetch(&config.api_url("/videos"), &options).await?;
    if !response.ok() {
        return Err(status_error(&response).into());
    }

    let list: VideoList = serde_json::from_value(response.json()?)
        .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse video list: {}", e)))?;
    Ok(list.videos)
}

/// Keep videos whose filename has a supported extension
pub fn filter_supported(videos: Vec<Video>, config: &Config) -> Vec<Video> {
    videos
        .into_iter()
        .filter(|v| config.is_supported_video(&v.filename))
        .collect()
}

/// Slice out a 1-based page, with the page size clamped to the configured limits
pub fn paginate<T: Clone>(
    items: &[T],
    page: usize,
    page_size: Option<usize>,
    config: &Config,
) -> Page<T> {
    let page_size = config.clamp_page_size(page_size);
    let page = page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size);

    let start = (page - 1).saturating_mul(page_size).min(total_items);
    let end = start.saturating_add(page_size).min(total_items);

    Page {
        items: items[start..end].to_vec(),
        page,
        page_size,
        total_items,
        total_pages,
    }
}

/// Absolute or origin-relative URL a video plays from
pub fn play_url(config: &Config, video: &Video) -> String {
    config.api_url(&video.path)
}
