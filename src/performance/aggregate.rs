// Per-topic aggregation and the weak-topic rule.
//
// A single pass folds every row into a TopicAggregate keyed by topic. Topics
// keep the order in which they were first seen, so the weak-topic list is
// deterministic without re-sorting. Any malformed row aborts the whole run.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use super::records::{PerformanceRecord, RawRecord};
use crate::error::Result;

/// Thresholds for the weak-topic rule. A topic is weak when accuracy is
/// below `accuracy_threshold` AND average time is above `time_threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeakTopicThresholds {
    /// Fraction of correct answers (default 0.6)
    pub accuracy_threshold: f64,
    /// Average seconds per question (default 80.0)
    pub time_threshold: f64,
}

impl Default for WeakTopicThresholds {
    fn default() -> Self {
        Self {
            accuracy_threshold: 0.6,
            time_threshold: 80.0,
        }
    }
}

/// Running totals for one topic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicAggregate {
    pub attempt_count: u64,
    /// Never exceeds `attempt_count`
    pub correct_count: u64,
    pub total_time: f64,
}

impl TopicAggregate {
    pub fn add(&mut self, record: &PerformanceRecord) {
        self.attempt_count += 1;
        if record.correct {
            self.correct_count += 1;
        }
        self.total_time += record.time_taken;
    }

    pub fn accuracy(&self) -> f64 {
        if self.attempt_count == 0 {
            return 0.0;
        }
        self.correct_count as f64 / self.attempt_count as f64
    }

    pub fn avg_time(&self) -> f64 {
        if self.attempt_count == 0 {
            return 0.0;
        }
        self.total_time / self.attempt_count as f64
    }

    pub fn is_weak(&self, thresholds: &WeakTopicThresholds) -> bool {
        self.attempt_count > 0
            && self.accuracy() < thresholds.accuracy_threshold
            && self.avg_time() > thresholds.time_threshold
    }
}

/// Derived per-topic summary, one per distinct topic in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicStats {
    pub topic: String,
    pub attempts: u64,
    pub correct: u64,
    pub accuracy: f64,
    pub avg_time: f64,
    pub weak: bool,
}

/// Result of `analyze`: weak topics in first-encounter order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeakTopicReport {
    pub weak_topics: Vec<String>,
}

impl WeakTopicReport {
    /// The weak topics of an already computed stats table, in table order.
    pub fn from_stats(stats: &[TopicStats]) -> Self {
        Self {
            weak_topics: stats
                .iter()
                .filter(|s| s.weak)
                .map(|s| s.topic.clone())
                .collect(),
        }
    }
}

/// Fold rows into per-topic aggregates, keeping first-seen topic order.
pub fn aggregate(records: &[RawRecord]) -> Result<Vec<(String, TopicAggregate)>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut topics: Vec<(String, TopicAggregate)> = Vec::new();

    for (row, raw) in records.iter().enumerate() {
        let record = PerformanceRecord::from_raw(row, raw)?;

        let slot = match index.get(&record.topic) {
            Some(&slot) => slot,
            None => {
                index.insert(record.topic.clone(), topics.len());
                topics.push((record.topic.clone(), TopicAggregate::default()));
                topics.len() - 1
            }
        };
        topics[slot].1.add(&record);
    }

    debug!(
        rows = records.len(),
        topics = topics.len(),
        "Aggregated performance records"
    );

    Ok(topics)
}

/// Per-topic accuracy, average time and weak flag.
pub fn topic_stats(
    records: &[RawRecord],
    thresholds: &WeakTopicThresholds,
) -> Result<Vec<TopicStats>> {
    let stats = aggregate(records)?
        .into_iter()
        .map(|(topic, agg)| TopicStats {
            weak: agg.is_weak(thresholds),
            accuracy: agg.accuracy(),
            avg_time: agg.avg_time(),
            attempts: agg.attempt_count,
            correct: agg.correct_count,
            topic,
        })
        .collect();
    Ok(stats)
}

/// Classify topics and return the weak ones.
///
/// An empty input yields an empty list. A single malformed row fails the run
/// with `Error::MalformedRecord`.
pub fn analyze(records: &[RawRecord], thresholds: &WeakTopicThresholds) -> Result<WeakTopicReport> {
    let report = WeakTopicReport::from_stats(&topic_stats(records, thresholds)?);

    info!(
        rows = records.len(),
        weak = report.weak_topics.len(),
        "Performance analysis complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(topic: &str, correct: u8, time: f64) -> RawRecord {
        RawRecord::new(topic, &correct.to_string(), &time.to_string())
    }

    #[test]
    fn test_slow_and_inaccurate_topic_is_weak() {
        let records = vec![rec("Loops", 1, 30.0), rec("Loops", 0, 150.0)];
        let stats = topic_stats(&records, &WeakTopicThresholds::default()).unwrap();
        assert_eq!(stats.len(), 1);
        assert!((stats[0].accuracy - 0.5).abs() < f64::EPSILON);
        assert!((stats[0].avg_time - 90.0).abs() < f64::EPSILON);

        let report = analyze(&records, &WeakTopicThresholds::default()).unwrap();
        assert_eq!(report.weak_topics, vec!["Loops".to_string()]);
    }

    #[test]
    fn test_accurate_topic_is_not_weak() {
        let records = vec![rec("Arrays", 1, 10.0), rec("Arrays", 1, 10.0)];
        let report = analyze(&records, &WeakTopicThresholds::default()).unwrap();
        assert!(report.weak_topics.is_empty());
    }

    #[test]
    fn test_both_conditions_required() {
        // Inaccurate but fast
        let fast = vec![rec("Maps", 0, 10.0)];
        assert!(analyze(&fast, &WeakTopicThresholds::default())
            .unwrap()
            .weak_topics
            .is_empty());

        // Slow but accurate
        let slow = vec![rec("Maps", 1, 200.0)];
        assert!(analyze(&slow, &WeakTopicThresholds::default())
            .unwrap()
            .weak_topics
            .is_empty());
    }

    #[test]
    fn test_thresholds_are_strict_inequalities() {
        // accuracy exactly 0.6 and avg_time exactly 80 -> not weak
        let records = vec![
            rec("Edge", 1, 80.0),
            rec("Edge", 1, 80.0),
            rec("Edge", 1, 80.0),
            rec("Edge", 0, 80.0),
            rec("Edge", 0, 80.0),
        ];
        let report = analyze(&records, &WeakTopicThresholds::default()).unwrap();
        assert!(report.weak_topics.is_empty());
    }

    #[test]
    fn test_custom_thresholds() {
        let records = vec![rec("Loops", 1, 30.0), rec("Loops", 1, 40.0)];
        let thresholds = WeakTopicThresholds {
            accuracy_threshold: 1.1,
            time_threshold: 20.0,
        };
        let report = analyze(&records, &thresholds).unwrap();
        assert_eq!(report.weak_topics, vec!["Loops".to_string()]);
    }

    #[test]
    fn test_report_from_stats_matches_analyze() {
        let records = vec![
            rec("Loops", 0, 100.0),
            rec("Arrays", 1, 10.0),
            rec("Graphs", 0, 95.0),
        ];
        let thresholds = WeakTopicThresholds::default();
        let stats = topic_stats(&records, &thresholds).unwrap();
        assert_eq!(
            WeakTopicReport::from_stats(&stats),
            analyze(&records, &thresholds).unwrap()
        );
    }

    #[test]
    fn test_counts_do_not_overflow_u32() {
        let mut agg = TopicAggregate {
            attempt_count: u32::MAX as u64,
            correct_count: u32::MAX as u64,
            total_time: 0.0,
        };
        let record = PerformanceRecord {
            topic: "Loops".to_string(),
            correct: true,
            time_taken: 1.0,
        };
        agg.add(&record);
        assert_eq!(agg.attempt_count, u32::MAX as u64 + 1);
        assert_eq!(agg.correct_count, u32::MAX as u64 + 1);
    }

    #[test]
    fn test_empty_input_is_empty_report() {
        let report = analyze(&[], &WeakTopicThresholds::default()).unwrap();
        assert!(report.weak_topics.is_empty());
    }

    #[test]
    fn test_aggregate_keeps_first_seen_order() {
        let records = vec![
            rec("B", 1, 1.0),
            rec("A", 1, 1.0),
            rec("B", 0, 1.0),
            rec("C", 1, 1.0),
        ];
        let topics: Vec<String> = aggregate(&records)
            .unwrap()
            .into_iter()
            .map(|(t, _)| t)
            .collect();
        assert_eq!(topics, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_malformed_row_fails_whole_run() {
        let records = vec![
            rec("Loops", 0, 150.0),
            RawRecord::new("Arrays", "1", "slow"),
        ];
        let err = analyze(&records, &WeakTopicThresholds::default()).unwrap_err();
        match err {
            crate::error::Error::MalformedRecord { row, topic, .. } => {
                assert_eq!(row, 1);
                assert_eq!(topic, "Arrays");
            }
            other => panic!("expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_aggregate_counts() {
        let records = vec![rec("T", 1, 5.0), rec("T", 0, 7.0), rec("T", 1, 3.0)];
        let (_, agg) = aggregate(&records).unwrap().remove(0);
        assert_eq!(agg.attempt_count, 3);
        assert_eq!(agg.correct_count, 2);
        assert!((agg.total_time - 15.0).abs() < f64::EPSILON);
    }
}
