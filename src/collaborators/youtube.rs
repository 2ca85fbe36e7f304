// YouTube Data API v3 video search.
//
// Calls `search.list` with `part=snippet&type=video` and maps each item to a
// Video. Items without a video id (channels, playlists that slip through)
// are skipped.
//
// API docs: https://developers.google.com/youtube/v3/docs/search/list

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::rate_limiter::RateLimiter;
use super::traits::{Video, VideoSearch};

pub const DEFAULT_YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";

/// YouTube search client.
pub struct YouTubeSearch {
    client: Client,
    api_key: String,
    base_url: String,
    rate_limiter: RateLimiter,
}

impl YouTubeSearch {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_YOUTUBE_API_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("learnpath/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            rate_limiter: RateLimiter::new(5.0),
        })
    }
}

#[async_trait]
impl VideoSearch for YouTubeSearch {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Video>> {
        self.rate_limiter.acquire().await;

        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("q", query),
                ("maxResults", &max_results.to_string()),
                ("key", &self.api_key),
            ])
            .send()
            .await
            .context("YouTube search request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("YouTube search returned {}: {}", status, body);
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .context("Failed to parse YouTube search response")?;

        let videos = parsed.into_videos();
        debug!(query = query, results = videos.len(), "YouTube search complete");
        Ok(videos)
    }
}

// --- search.list response types ---

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub struct SearchItem {
    pub id: SearchItemId,
    pub snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItemId {
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Snippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

impl SearchResponse {
    pub fn into_videos(self) -> Vec<Video> {
        self.items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                let thumbs = item.snippet.thumbnails;
                let thumbnail = thumbs
                    .default
                    .or(thumbs.medium)
                    .or(thumbs.high)
                    .map(|t| t.url)
                    .unwrap_or_default();
                Some(Video {
                    title: item.snippet.title,
                    url: watch_url(&video_id),
                    thumbnail,
                    description: item.snippet.description,
                })
            })
            .collect()
    }
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}
