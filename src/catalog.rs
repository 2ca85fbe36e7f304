// Subtopic catalog: the static corpus the recommender ranks against.
//
// Loaded once at startup from a CSV with `Topic,Subtopic` headers. Empty
// subtopic cells become empty strings rather than being dropped, so row i of
// the catalog always lines up with row i of the term-weighting model.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};

/// A single catalog row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "Topic", default)]
    pub topic: String,
    #[serde(rename = "Subtopic", default)]
    pub subtopic: String,
}

impl CatalogEntry {
    pub fn new(topic: &str, subtopic: &str) -> Self {
        Self {
            topic: topic.to_string(),
            subtopic: subtopic.to_string(),
        }
    }
}

/// Parse catalog rows from any CSV reader.
pub fn read_catalog<R: Read>(reader: R) -> Result<Vec<CatalogEntry>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| Error::input("catalog", e))?
        .clone();
    if !headers.iter().any(|h| h == "Topic") || !headers.iter().any(|h| h == "Subtopic") {
        return Err(Error::input(
            "catalog",
            "expected `Topic` and `Subtopic` columns",
        ));
    }

    csv_reader
        .deserialize()
        .collect::<std::result::Result<Vec<CatalogEntry>, _>>()
        .map_err(|e| Error::input("catalog", e))
}

/// Load the catalog from a CSV file on disk.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogEntry>> {
    let file = std::fs::File::open(path)
        .map_err(|e| Error::input("catalog", format!("{}: {e}", path.display())))?;
    let entries = read_catalog(file)?;

    info!(
        path = %path.display(),
        entries = entries.len(),
        "Loaded subtopic catalog"
    );

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_catalog_keeps_empty_subtopics() {
        let csv = "Topic,Subtopic\nAI,neural networks\nAI,\nML,decision trees\n";
        let entries = read_catalog(csv.as_bytes()).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], CatalogEntry::new("AI", "neural networks"));
        assert_eq!(entries[1].subtopic, "");
        assert_eq!(entries[2].topic, "ML");
    }

    #[test]
    fn test_read_catalog_short_row() {
        // A row missing its trailing Subtopic cell is tolerated
        let csv = "Topic,Subtopic\nAI\n";
        let entries = read_catalog(csv.as_bytes()).unwrap();
        assert_eq!(entries, vec![CatalogEntry::new("AI", "")]);
    }

    #[test]
    fn test_read_catalog_requires_headers() {
        let csv = "Name,Description\nx,y\n";
        assert!(matches!(
            read_catalog(csv.as_bytes()),
            Err(Error::Input { input: "catalog", .. })
        ));
    }

    #[test]
    fn test_load_catalog_missing_file() {
        let err = load_catalog(Path::new("/nonexistent/catalog.csv")).unwrap_err();
        assert!(err.to_string().contains("catalog"));
    }
}
