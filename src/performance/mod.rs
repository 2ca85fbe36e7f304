// Performance analyzer: quiz log rows to weak topics.

pub mod aggregate;
pub mod records;

pub use aggregate::{analyze, topic_stats, TopicStats, WeakTopicReport, WeakTopicThresholds};
pub use records::{read_records, PerformanceRecord, RawRecord};
