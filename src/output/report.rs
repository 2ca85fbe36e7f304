// Markdown report for a performance analysis.

use std::fmt::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::performance::{TopicStats, WeakTopicThresholds};

pub fn build_report(
    source: &str,
    stats: &[TopicStats],
    thresholds: &WeakTopicThresholds,
    generated_at: DateTime<Utc>,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Learner Performance Report");
    let _ = writeln!(
        output,
        "Generated {} from `{}`",
        generated_at.format("%Y-%m-%d %H:%M UTC"),
        source
    );
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "A topic is weak when accuracy is below {:.0}% and the average time per question is above {:.0}s.",
        thresholds.accuracy_threshold * 100.0,
        thresholds.time_threshold
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Weak Topics");

    let weak: Vec<&TopicStats> = stats.iter().filter(|s| s.weak).collect();
    if weak.is_empty() {
        let _ = writeln!(output, "No weak topics.");
    } else {
        for s in &weak {
            let _ = writeln!(
                output,
                "- {} ({:.0}% correct, {:.1}s average)",
                s.topic,
                s.accuracy * 100.0,
                s.avg_time
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## All Topics");

    if stats.is_empty() {
        let _ = writeln!(output, "No quiz records.");
    } else {
        let _ = writeln!(output, "| Topic | Attempts | Correct | Accuracy | Avg time (s) | Weak |");
        let _ = writeln!(output, "|---|---:|---:|---:|---:|:---:|");
        for s in stats {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {:.0}% | {:.1} | {} |",
                s.topic.replace('|', "\\|"),
                s.attempts,
                s.correct,
                s.accuracy * 100.0,
                s.avg_time,
                if s.weak { "yes" } else { "" }
            );
        }
    }

    output
}

/// Write the report to `path`, creating parent directories as needed.
pub fn write_report(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}
