// Colored terminal output for analyses, recommendations and summaries.
//
// main.rs delegates all human-facing formatting here; `--json` output
// bypasses this module entirely.

use colored::Colorize;

use crate::performance::{TopicStats, WeakTopicThresholds};
use crate::recommend::{EnrichedRecommendation, Recommendation};
use crate::summarize::VideoSummary;

/// Display per-topic stats with weak topics highlighted, followed by the
/// weak-topic list.
pub fn display_analysis(source: &str, stats: &[TopicStats], thresholds: &WeakTopicThresholds) {
    println!(
        "\n{}",
        format!("=== Performance Analysis: {source} ({} topics) ===", stats.len()).bold()
    );

    if stats.is_empty() {
        println!("\n  No quiz records found.");
        return;
    }

    println!();
    println!(
        "  {:<32} {:>8}  {:>8}  {:>9}",
        "Topic".dimmed(),
        "Attempts".dimmed(),
        "Accuracy".dimmed(),
        "Avg time".dimmed(),
    );
    println!("  {}", "-".repeat(64).dimmed());

    for s in stats {
        let accuracy = format!("{:>7.0}%", s.accuracy * 100.0);
        let avg_time = format!("{:>8.1}s", s.avg_time);
        let (accuracy, avg_time) = if s.weak {
            (accuracy.red().bold(), avg_time.red().bold())
        } else {
            (colorize_accuracy(&accuracy, s.accuracy, thresholds), avg_time.normal())
        };
        println!(
            "  {:<32} {:>8}  {}  {}",
            super::truncate_chars(&s.topic, 32),
            s.attempts,
            accuracy,
            avg_time,
        );
    }

    println!();
    let weak: Vec<&str> = stats.iter().filter(|s| s.weak).map(|s| s.topic.as_str()).collect();
    display_weak_topics(&weak, thresholds);
}

/// Display the weak-topic list on its own.
pub fn display_weak_topics(weak: &[&str], thresholds: &WeakTopicThresholds) {
    if weak.is_empty() {
        println!(
            "  {} No weak topics (accuracy < {:.0}% and avg time > {:.0}s)",
            "ok".green().bold(),
            thresholds.accuracy_threshold * 100.0,
            thresholds.time_threshold
        );
        return;
    }

    println!(
        "  {} {} weak topic(s) (accuracy < {:.0}% and avg time > {:.0}s):",
        "!!".red().bold(),
        weak.len(),
        thresholds.accuracy_threshold * 100.0,
        thresholds.time_threshold
    );
    for topic in weak {
        println!("     - {}", topic.bold());
    }
}

/// Display ranked recommendations without videos.
pub fn display_recommendations(query: &str, recs: &[Recommendation]) {
    print_recommendation_header(query, recs.len());
    for (i, rec) in recs.iter().enumerate() {
        print_recommendation_line(i, rec);
    }
    println!();
}

/// Display ranked recommendations with their videos.
pub fn display_enriched(query: &str, recs: &[EnrichedRecommendation]) {
    print_recommendation_header(query, recs.len());
    for (i, enriched) in recs.iter().enumerate() {
        print_recommendation_line(i, &enriched.recommendation);
        if enriched.videos.is_empty() {
            println!("        {}", "no videos found".dimmed());
        }
        for video in &enriched.videos {
            println!("        {} {}", ">".bright_red(), video.title);
            println!("          {}", video.url.underline());
            if !video.description.is_empty() {
                println!(
                    "          {}",
                    super::truncate_chars(&video.description, 100).dimmed()
                );
            }
        }
        println!();
    }
}

fn print_recommendation_header(query: &str, count: usize) {
    println!(
        "\n{}",
        format!("=== Recommendations for \"{query}\" ({count}) ===").bold()
    );
    println!();
}

fn print_recommendation_line(i: usize, rec: &Recommendation) {
    let score = format!("{:.3}", rec.score);
    let score = if rec.score >= 0.5 {
        score.bright_green()
    } else if rec.score > 0.0 {
        score.bright_yellow()
    } else {
        score.dimmed()
    };
    let subtopic = if rec.subtopic.is_empty() {
        "(no subtopic)".dimmed().to_string()
    } else {
        rec.subtopic.bold().to_string()
    };
    println!("  {:>2}. [{}] {}  {}", i + 1, score, subtopic, rec.topic.dimmed());
}

/// Display a video summary.
pub fn display_summary(summary: &VideoSummary) {
    println!(
        "\n{}",
        format!(
            "=== Summary of {} ({} transcript chunk(s)) ===",
            summary.video_id, summary.chunks
        )
        .bold()
    );
    println!();
    for paragraph in summary.summary.split("\n\n") {
        println!("{}", paragraph.trim());
        println!();
    }
}

/// Green when comfortably above the accuracy threshold, yellow when under it.
fn colorize_accuracy(
    text: &str,
    accuracy: f64,
    thresholds: &WeakTopicThresholds,
) -> colored::ColoredString {
    if accuracy < thresholds.accuracy_threshold {
        text.yellow()
    } else {
        text.green()
    }
}
