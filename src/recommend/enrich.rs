// Video enrichment: one video search per ranked subtopic.
//
// Lookups run concurrently with bounded parallelism, but `buffered` yields
// results in input order, so the ranking order survives enrichment. Any
// failed lookup fails the whole request; there is no partially enriched
// result.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use super::Recommendation;
use crate::collaborators::guard;
use crate::collaborators::traits::{Video, VideoSearch};
use crate::error::{Error, Result};

/// A recommendation paired with its videos.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecommendation {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub videos: Vec<Video>,
}

#[derive(Debug, Clone)]
pub struct LookupOptions {
    /// Videos requested per recommendation (default 3)
    pub videos_per_result: u32,
    /// Maximum lookups in flight (default 4)
    pub concurrency: usize,
    /// Per-lookup timeout (default 30s)
    pub timeout: Duration,
    /// Draw a terminal progress bar
    pub show_progress: bool,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            videos_per_result: 3,
            concurrency: 4,
            timeout: Duration::from_secs(30),
            show_progress: false,
        }
    }
}

/// The text sent to video search for a recommendation. Entries with an empty
/// subtopic fall back to their topic.
pub fn search_query(rec: &Recommendation) -> &str {
    if rec.subtopic.trim().is_empty() {
        &rec.topic
    } else {
        &rec.subtopic
    }
}

/// Look up videos for every recommendation, preserving order.
pub async fn attach_videos(
    recommendations: Vec<Recommendation>,
    search: &dyn VideoSearch,
    options: &LookupOptions,
) -> Result<Vec<EnrichedRecommendation>> {
    let pb = if options.show_progress {
        let pb = ProgressBar::new(recommendations.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  Finding videos [{bar:30}] {pos}/{len}")
                .expect("valid template"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let results: Vec<Result<EnrichedRecommendation>> =
        stream::iter(recommendations.into_iter().map(|rec| {
            let pb = pb.clone();
            async move {
                let videos = guard(
                    "video search",
                    options.timeout,
                    search.search(search_query(&rec), options.videos_per_result),
                )
                .await?;
                pb.inc(1);
                Ok::<_, Error>(EnrichedRecommendation {
                    recommendation: rec,
                    videos,
                })
            }
        }))
        .buffered(options.concurrency.max(1))
        .collect()
        .await;

    pb.finish_and_clear();

    let enriched = results.into_iter().collect::<Result<Vec<_>>>()?;
    info!(
        recommendations = enriched.len(),
        videos = enriched.iter().map(|e| e.videos.len()).sum::<usize>(),
        "Attached videos to recommendations"
    );
    Ok(enriched)
}
