// Subtopic recommender: catalog plus its fitted term-weighting model.
//
// The model is built once from the catalog and never mutated, so a
// Recommender is shared read-only (Arc) across concurrent requests. The web
// server builds it lazily through LazyRecommender; the CLI builds it eagerly.

pub mod enrich;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::OnceCell;

use crate::catalog::{load_catalog, CatalogEntry};
use crate::error::{Error, Result};
use crate::similarity::{rank, TermWeightingModel};

pub use enrich::{attach_videos, EnrichedRecommendation, LookupOptions};

/// A ranked catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub topic: String,
    pub subtopic: String,
    pub score: f64,
}

pub struct Recommender {
    catalog: Vec<CatalogEntry>,
    model: TermWeightingModel,
}

impl Recommender {
    /// Fit the model over the catalog's subtopics. Row i of the model is
    /// catalog entry i.
    pub fn new(catalog: Vec<CatalogEntry>) -> Self {
        let subtopics: Vec<&str> = catalog.iter().map(|e| e.subtopic.as_str()).collect();
        let model = TermWeightingModel::build(&subtopics);
        Self { catalog, model }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Self::new(load_catalog(path)?))
    }

    /// Top `top_n` catalog entries most similar to `query`.
    pub fn recommend(&self, query: &str, top_n: usize) -> Result<Vec<Recommendation>> {
        let ranked = rank(query, &self.model, top_n)?;
        Ok(ranked
            .into_iter()
            .map(|r| {
                let entry = &self.catalog[r.index];
                Recommendation {
                    topic: entry.topic.clone(),
                    subtopic: entry.subtopic.clone(),
                    score: r.score,
                }
            })
            .collect())
    }

    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    pub fn model(&self) -> &TermWeightingModel {
        &self.model
    }
}

/// Build-once holder for a Recommender loaded from a catalog file.
///
/// The first caller loads the catalog and fits the model; concurrent callers
/// wait on the same initialization. A failed load is not cached, so the next
/// caller retries it.
pub struct LazyRecommender {
    path: PathBuf,
    cell: OnceCell<Arc<Recommender>>,
}

impl LazyRecommender {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            cell: OnceCell::new(),
        }
    }

    /// A holder that is already initialized.
    pub fn ready(recommender: Recommender) -> Self {
        Self {
            path: PathBuf::new(),
            cell: OnceCell::new_with(Some(Arc::new(recommender))),
        }
    }

    pub async fn get(&self) -> Result<Arc<Recommender>> {
        self.cell
            .get_or_try_init(|| async {
                let path = self.path.clone();
                tokio::task::spawn_blocking(move || Recommender::from_path(&path))
                    .await
                    .map_err(|e| Error::input("catalog", e))
                    .and_then(|built| built.map(Arc::new))
            })
            .await
            .cloned()
    }
}
