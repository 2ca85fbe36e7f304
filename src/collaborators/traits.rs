// Collaborator traits: single-capability seams around external services.
//
// The core never talks to the network. Video search, transcript retrieval,
// summarization and quiz-log fetching all sit behind these traits so the
// boundary layer can inject real HTTP clients in production and fakes in
// tests. Implementations report failures with anyhow; the boundary converts
// them into Error::CollaboratorFailure (see collaborators::guard).

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A video resource attached to a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub title: String,
    pub url: String,
    pub thumbnail: String,
    pub description: String,
}

/// Searches for videos matching a subtopic.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Return up to `max_results` videos, best match first. An empty list is
    /// a valid answer, distinct from an error.
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Video>>;
}

/// Fetches the spoken-text transcript of a video.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn transcript(&self, video_id: &str) -> Result<String>;
}

/// Condenses a block of text into a short summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String>;
}

/// Retrieves the raw quiz-log CSV from a URL or path.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<String>;
}
