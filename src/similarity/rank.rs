// Cosine-similarity ranking of catalog rows against a query.
//
// Query and rows are both unit vectors, so the cosine is the dot product.
// Sorting is stable, so equal scores keep catalog order.

use serde::Serialize;
use tracing::debug;

use super::model::TermWeightingModel;
use crate::error::{Error, Result};

/// A catalog row index paired with its similarity to the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedRow {
    pub index: usize,
    pub score: f64,
}

/// Rank every catalog row by similarity to `query`.
///
/// Returns `min(top_n, model.len())` rows, best first. Fails with
/// `InvalidArgument` when `top_n` is zero or the model has no rows.
pub fn rank(query: &str, model: &TermWeightingModel, top_n: usize) -> Result<Vec<RankedRow>> {
    if top_n == 0 {
        return Err(Error::invalid("top_n must be greater than zero"));
    }
    if model.is_empty() {
        return Err(Error::invalid("cannot rank against an empty catalog"));
    }

    let query_vec = model.transform(query);

    let mut ranked: Vec<RankedRow> = model
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| RankedRow {
            index,
            score: if query_vec.is_zero() || row.is_zero() {
                0.0
            } else {
                query_vec.dot(row)
            },
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(top_n);

    debug!(
        query = query,
        returned = ranked.len(),
        top_score = ranked.first().map(|r| r.score).unwrap_or(0.0),
        "Ranked catalog rows"
    );

    Ok(ranked)
}
