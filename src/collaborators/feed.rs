// Quiz-log feed: fetches the CSV text from an http(s) URL or a local path.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::traits::FeedSource;

pub struct CsvFeed {
    client: Client,
}

impl CsvFeed {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("learnpath/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

pub fn is_remote(location: &str) -> bool {
    let lower = location.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// The last path segment of a location, used as the display file name.
pub fn file_name(location: &str) -> String {
    let trimmed = location.trim();
    let without_query = trimmed.split(['?', '#']).next().unwrap_or(trimmed);
    without_query
        .trim_end_matches('/')
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(without_query)
        .to_string()
}

#[async_trait]
impl FeedSource for CsvFeed {
    async fn fetch(&self, location: &str) -> Result<String> {
        let location = location.trim();

        if !is_remote(location) {
            let text = tokio::fs::read_to_string(location)
                .await
                .with_context(|| format!("Failed to read quiz log {location}"))?;
            debug!(path = location, bytes = text.len(), "Read quiz log from disk");
            return Ok(text);
        }

        let response = self
            .client
            .get(location)
            .send()
            .await
            .context("Quiz log download failed")?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Quiz log download returned {}", status);
        }

        let text = response
            .text()
            .await
            .context("Failed to read quiz log body")?;
        debug!(url = location, bytes = text.len(), "Downloaded quiz log");
        Ok(text)
    }
}
