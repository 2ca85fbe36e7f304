// Video transcripts from YouTube's timed-text endpoint.
//
// The endpoint answers with XML shaped like
//   <transcript><text start="0.1" dur="2.3">hello &amp;amp; welcome</text>...</transcript>
// Caption text is frequently double-escaped, so entities are unescaped until
// the text stops changing (at most twice).

use std::sync::LazyLock;

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex_lite::Regex;
use reqwest::{Client, Url};
use tracing::debug;

use super::traits::TranscriptSource;

pub const DEFAULT_TIMEDTEXT_URL: &str = "https://www.youtube.com/api/timedtext";

static TEXT_ELEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<text[^>]*>(.*?)</text>").expect("valid pattern"));

static NUMERIC_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("valid pattern"));

/// Transcript client for the timed-text endpoint.
pub struct TimedTextTranscripts {
    client: Client,
    base_url: String,
    lang: String,
}

impl TimedTextTranscripts {
    pub fn new(lang: &str) -> Result<Self> {
        Self::with_base_url(lang, DEFAULT_TIMEDTEXT_URL)
    }

    pub fn with_base_url(lang: &str, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("learnpath/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            lang: lang.to_string(),
        })
    }
}

#[async_trait]
impl TranscriptSource for TimedTextTranscripts {
    async fn transcript(&self, video_id: &str) -> Result<String> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("v", video_id), ("lang", self.lang.as_str())])
            .send()
            .await
            .context("Transcript request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Transcript endpoint returned {} for video {}", status, video_id);
        }

        let body = response
            .text()
            .await
            .context("Failed to read transcript body")?;
        let text = parse_timed_text(&body);

        if text.is_empty() {
            anyhow::bail!("No transcript available for video {video_id}");
        }

        debug!(video_id = video_id, chars = text.len(), "Fetched transcript");
        Ok(text)
    }
}

/// Extract caption text from timed-text XML, joined with single spaces.
pub fn parse_timed_text(xml: &str) -> String {
    let segments: Vec<String> = TEXT_ELEMENT
        .captures_iter(xml)
        .filter_map(|c| c.get(1))
        .map(|m| unescape_xml(m.as_str()))
        .collect();

    segments.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn unescape_xml(text: &str) -> String {
    let mut current = text.to_string();
    for _ in 0..2 {
        let next = unescape_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn unescape_once(text: &str) -> String {
    let named = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&");

    NUMERIC_ENTITY
        .replace_all(&named, |caps: &regex_lite::Captures| {
            let code = &caps[1];
            let parsed = match code.strip_prefix('x') {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => code.parse::<u32>().ok(),
            };
            parsed
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Pull the video id out of a YouTube URL.
///
/// Accepts `youtu.be/<id>`, `youtube.com/watch?v=<id>`, `/shorts/<id>`,
/// `/embed/<id>`, `/live/<id>`, and a bare 11-character id.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if is_video_id(input) {
        return Some(input.to_string());
    }

    let url = Url::parse(input).ok()?;
    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");

    let id = match host {
        "youtu.be" => url.path_segments()?.next().map(str::to_string),
        "youtube.com" | "music.youtube.com" | "youtube-nocookie.com" => {
            let mut segments = url.path_segments()?;
            match segments.next() {
                Some("watch") => url
                    .query_pairs()
                    .find(|(k, _)| k == "v")
                    .map(|(_, v)| v.into_owned()),
                Some("shorts") | Some("embed") | Some("live") => {
                    segments.next().map(str::to_string)
                }
                _ => None,
            }
        }
        _ => None,
    }?;

    is_video_id(&id).then_some(id)
}

fn is_video_id(s: &str) -> bool {
    s.len() == 11
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
