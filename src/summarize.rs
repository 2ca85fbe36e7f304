// Video summarization: transcript, word chunks, per-chunk summaries.
//
// Long transcripts exceed what a single summarization call handles well, so
// the transcript is packed into word-aligned chunks of bounded size and each
// chunk is summarized in turn. Chunk summaries are joined with blank lines.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use crate::collaborators::guard;
use crate::collaborators::traits::{Summarizer, TranscriptSource};
use crate::collaborators::transcript::extract_video_id;
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct SummaryOptions {
    /// Upper bound on chunk length in characters (default 1000)
    pub max_chunk_chars: usize,
    /// Per-call timeout for transcript and summary requests
    pub timeout: Duration,
    pub show_progress: bool,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            max_chunk_chars: 1000,
            timeout: Duration::from_secs(60),
            show_progress: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoSummary {
    pub video_id: String,
    pub chunks: usize,
    pub summary: String,
}

/// Pack words into chunks of at most `max_chars` characters, counting one
/// separator per word. A word longer than the limit gets a chunk of its own.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count() + 1;
        if !current.is_empty() && current_len + word_len > max_chars {
            chunks.push(current.join(" "));
            current.clear();
            current_len = 0;
        }
        current.push(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}

/// Fetch the transcript for `video_url` and summarize it chunk by chunk.
///
/// Fails with `InvalidArgument` when no video id can be extracted, and with
/// `CollaboratorFailure` when the transcript or any chunk summary fails.
pub async fn summarize_video(
    video_url: &str,
    transcripts: &dyn TranscriptSource,
    summarizer: &dyn Summarizer,
    options: &SummaryOptions,
) -> Result<VideoSummary> {
    let video_id = extract_video_id(video_url)
        .ok_or_else(|| Error::invalid(format!("not a recognizable YouTube URL: {video_url}")))?;

    let transcript = guard(
        "transcript",
        options.timeout,
        transcripts.transcript(&video_id),
    )
    .await?;

    let chunks = split_text(&transcript, options.max_chunk_chars);
    info!(
        video_id = %video_id,
        words = transcript.split_whitespace().count(),
        chunks = chunks.len(),
        "Summarizing transcript"
    );

    let pb = if options.show_progress {
        let pb = ProgressBar::new(chunks.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  Summarizing [{bar:30}] {pos}/{len} ({eta})")
                .expect("valid template"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut summaries = Vec::with_capacity(chunks.len());
    for chunk in &chunks {
        let summary = guard("summarizer", options.timeout, summarizer.summarize(chunk)).await;
        match summary {
            Ok(s) => summaries.push(s.trim().to_string()),
            Err(e) => {
                pb.abandon();
                return Err(e);
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(VideoSummary {
        video_id,
        chunks: chunks.len(),
        summary: summaries.join("\n\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_text_respects_limit() {
        let text = "aaaa bbbb cccc dddd";
        // each word costs 5; limit 10 fits two words
        let chunks = split_text(text, 10);
        assert_eq!(chunks, vec!["aaaa bbbb", "cccc dddd"]);
    }

    #[test]
    fn test_split_text_long_word_gets_own_chunk() {
        let chunks = split_text("hi supercalifragilistic yo", 8);
        assert_eq!(chunks, vec!["hi", "supercalifragilistic", "yo"]);
    }

    #[test]
    fn test_split_text_empty() {
        assert!(split_text("", 1000).is_empty());
        assert!(split_text("   \n ", 1000).is_empty());
    }

    #[test]
    fn test_split_text_single_chunk() {
        let chunks = split_text("one two  three\nfour", 1000);
        assert_eq!(chunks, vec!["one two three four"]);
    }
}
