// Quiz log rows: raw CSV form and the validated PerformanceRecord.
//
// The feed is a CSV with `Topic,Correct,Time_Taken` headers. Cells arrive as
// strings; numeric validation happens per row so a bad value can be reported
// with its row index and topic.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One row as it appears in the quiz log, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Topic", default)]
    pub topic: String,
    #[serde(rename = "Correct", default)]
    pub correct: String,
    #[serde(rename = "Time_Taken", default)]
    pub time_taken: String,
}

impl RawRecord {
    pub fn new(topic: &str, correct: &str, time_taken: &str) -> Self {
        Self {
            topic: topic.to_string(),
            correct: correct.to_string(),
            time_taken: time_taken.to_string(),
        }
    }
}

/// A validated row of learner activity.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceRecord {
    pub topic: String,
    pub correct: bool,
    /// Seconds spent on the question
    pub time_taken: f64,
}

impl PerformanceRecord {
    /// Validate a raw row. `row` is the 0-based data row index used in errors.
    ///
    /// `Correct` accepts `true`/`false` or any number (non-zero is correct).
    /// `Time_Taken` must be a finite, non-negative number.
    pub fn from_raw(row: usize, raw: &RawRecord) -> Result<Self> {
        let malformed = |field: &'static str, value: &str| Error::MalformedRecord {
            row,
            topic: raw.topic.clone(),
            field,
            value: value.to_string(),
        };

        let correct = parse_correct(&raw.correct).ok_or_else(|| malformed("Correct", &raw.correct))?;

        let time_taken = raw
            .time_taken
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|t| t.is_finite() && *t >= 0.0)
            .ok_or_else(|| malformed("Time_Taken", &raw.time_taken))?;

        Ok(Self {
            topic: raw.topic.clone(),
            correct,
            time_taken,
        })
    }
}

fn parse_correct(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        return Some(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return Some(false);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v != 0.0)
}

/// Parse a quiz log CSV into raw rows.
///
/// Fails with `Error::Input` if the header row lacks the expected columns or
/// the CSV itself is broken. Extra columns are ignored.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| Error::input("quiz log", e))?
        .clone();
    for required in ["Topic", "Correct", "Time_Taken"] {
        if !headers.iter().any(|h| h == required) {
            return Err(Error::input(
                "quiz log",
                format!("missing required column {required:?}"),
            ));
        }
    }

    csv_reader
        .deserialize()
        .collect::<std::result::Result<Vec<RawRecord>, _>>()
        .map_err(|e| Error::input("quiz log", e))
}
