use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use learnpath::collaborators::feed::{self, CsvFeed};
use learnpath::collaborators::gemini::GeminiSummarizer;
use learnpath::collaborators::guard;
use learnpath::collaborators::traits::FeedSource;
use learnpath::collaborators::transcript::TimedTextTranscripts;
use learnpath::collaborators::youtube::YouTubeSearch;
use learnpath::config::Config;
use learnpath::output::{report, terminal};
use learnpath::performance::{read_records, topic_stats, WeakTopicReport};
use learnpath::recommend::{attach_videos, LookupOptions, Recommender};
use learnpath::summarize::{summarize_video, SummaryOptions};

/// learnpath: find where a learner struggles and what to study next.
///
/// Analyzes quiz logs for weak topics, ranks catalog subtopics against a
/// query, and summarizes lecture videos from their transcripts.
#[derive(Parser)]
#[command(name = "learnpath", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find weak topics in a quiz log (CSV with Topic,Correct,Time_Taken)
    Analyze {
        /// Local path or http(s) URL of the quiz log
        source: String,

        /// Also write a markdown report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print the weak-topic list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Recommend catalog subtopics similar to a query
    Recommend {
        /// Free-text query, e.g. a weak topic
        query: String,

        /// Number of recommendations (default: LEARNPATH_TOP_N or 5)
        #[arg(long)]
        top_n: Option<usize>,

        /// Skip the YouTube video lookups
        #[arg(long)]
        no_videos: bool,

        /// Print recommendations as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize a YouTube video from its transcript
    Summarize {
        /// Video URL or 11-character video id
        video_url: String,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the JSON API server
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (default: PORT or 3030)
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("learnpath=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Analyze {
            source,
            report: report_path,
            json,
        } => {
            let feed_source = CsvFeed::new()?;
            let text = guard(
                "quiz log feed",
                config.collaborator_timeout,
                feed_source.fetch(&source),
            )
            .await?;

            let records = read_records(text.as_bytes())?;
            let stats = topic_stats(&records, &config.thresholds)?;
            let weak = WeakTopicReport::from_stats(&stats);
            info!(
                records = records.len(),
                topics = stats.len(),
                weak = weak.weak_topics.len(),
                "Analysis complete"
            );

            let file_name = feed::file_name(&source);
            if json {
                println!("{}", serde_json::to_string_pretty(&weak)?);
            } else {
                terminal::display_analysis(&file_name, &stats, &config.thresholds);
            }

            if let Some(path) = report_path {
                let contents = report::build_report(
                    &file_name,
                    &stats,
                    &config.thresholds,
                    chrono::Utc::now(),
                );
                report::write_report(&path, &contents)?;
                if !json {
                    println!("\n{} {}", "Report written to".dimmed(), path.display());
                }
            }
        }

        Commands::Recommend {
            query,
            top_n,
            no_videos,
            json,
        } => {
            let top_n = top_n.unwrap_or(config.default_top_n);
            let catalog_path = config.catalog_path.clone();
            let recommender = tokio::task::spawn_blocking(move || {
                Recommender::from_path(&catalog_path)
            })
            .await
            .context("Catalog loader panicked")??;
            info!(
                entries = recommender.catalog().len(),
                terms = recommender.model().vocabulary().len(),
                "Recommender ready"
            );

            let recs = recommender.recommend(&query, top_n)?;

            if no_videos {
                if json {
                    println!("{}", serde_json::to_string_pretty(&recs)?);
                } else {
                    terminal::display_recommendations(&query, &recs);
                }
                return Ok(());
            }

            config.require_youtube()?;
            let search = YouTubeSearch::new(config.youtube_api_key.clone())?;
            let options = LookupOptions {
                videos_per_result: config.videos_per_result,
                timeout: config.collaborator_timeout,
                show_progress: !json,
                ..LookupOptions::default()
            };
            let enriched = attach_videos(recs, &search, &options).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&enriched)?);
            } else {
                terminal::display_enriched(&query, &enriched);
            }
        }

        Commands::Summarize { video_url, json } => {
            config.require_google()?;
            let transcripts = TimedTextTranscripts::new("en")?;
            let summarizer =
                GeminiSummarizer::new(config.google_api_key.clone(), &config.summary_model)?;
            let options = SummaryOptions {
                timeout: config.collaborator_timeout,
                show_progress: !json,
                ..SummaryOptions::default()
            };

            let summary = summarize_video(&video_url, &transcripts, &summarizer, &options).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                terminal::display_summary(&summary);
            }
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let port = port.unwrap_or(config.port);
            learnpath::web::run_server(config, port, &bind).await?;
        }
    }

    Ok(())
}
