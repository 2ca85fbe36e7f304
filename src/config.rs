use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::performance::WeakTopicThresholds;

/// Central configuration loaded from environment variables.
///
/// API keys come from env vars (never hardcoded). The .env file is loaded
/// automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Subtopic catalog CSV (LEARNPATH_CATALOG)
    pub catalog_path: PathBuf,
    pub youtube_api_key: String,
    pub google_api_key: String,
    /// Gemini model used for summaries
    pub summary_model: String,
    pub thresholds: WeakTopicThresholds,
    pub default_top_n: usize,
    pub videos_per_result: u32,
    /// Timeout applied to every external service call
    pub collaborator_timeout: Duration,
    /// Origin allowed by the web server's CORS layer
    pub cors_origin: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default except the API keys, which are only checked
    /// by the commands that need them (see `require_youtube`,
    /// `require_google`).
    pub fn load() -> Result<Self> {
        let defaults = WeakTopicThresholds::default();

        Ok(Self {
            catalog_path: env::var("LEARNPATH_CATALOG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data/catalog.csv")),
            youtube_api_key: env::var("YOUTUBE_API_KEY").unwrap_or_default(),
            google_api_key: env::var("GOOGLE_API_KEY").unwrap_or_default(),
            summary_model: env::var("LEARNPATH_SUMMARY_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-pro".to_string()),
            thresholds: WeakTopicThresholds {
                accuracy_threshold: parse_var(
                    "LEARNPATH_ACCURACY_THRESHOLD",
                    defaults.accuracy_threshold,
                )?,
                time_threshold: parse_var("LEARNPATH_TIME_THRESHOLD", defaults.time_threshold)?,
            },
            default_top_n: parse_var("LEARNPATH_TOP_N", 5)?,
            videos_per_result: parse_var("LEARNPATH_VIDEOS_PER_RESULT", 3)?,
            collaborator_timeout: Duration::from_secs(parse_var("LEARNPATH_TIMEOUT_SECS", 30)?),
            cors_origin: env::var("LEARNPATH_CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: parse_var("PORT", 3030)?,
        })
    }

    /// Check that the YouTube Data API key is configured.
    /// Call this before any operation that looks up videos.
    pub fn require_youtube(&self) -> Result<()> {
        if self.youtube_api_key.is_empty() {
            anyhow::bail!(
                "YOUTUBE_API_KEY not set. Add it to your .env file,\n\
                 or pass --no-videos to rank subtopics without video lookups."
            );
        }
        Ok(())
    }

    /// Check that the Google generative-language key is configured.
    /// Call this before summarizing a video.
    pub fn require_google(&self) -> Result<()> {
        if self.google_api_key.is_empty() {
            anyhow::bail!("GOOGLE_API_KEY not set. Add it to your .env file to enable summaries.");
        }
        Ok(())
    }
}

/// Parse an optional env var, falling back to `default` when unset or blank.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{name} has an invalid value: {raw:?}")),
        _ => Ok(default),
    }
}
