// Term-weighting model: TF-IDF over the catalog's subtopic strings.
//
// Vocabulary is the sorted set of tokens that survive tokenization; a term's
// index is its position in that order. IDF uses the smoothed form
//
//   idf(t) = ln((1 + n) / (1 + df(t))) + 1
//
// so a term present in every document still carries weight 1. Each row is
// raw term count * idf, scaled to unit length (or left empty when the
// document has no recognized tokens).

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use super::tokenize::Tokenizer;

/// Sparse vector of (term index, weight), sorted by term index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    fn from_counts(counts: BTreeMap<usize, f64>, idf: &[f64]) -> Self {
        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * idf[idx]))
            .collect();

        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm < f64::EPSILON {
            return Self::default();
        }
        for (_, w) in &mut entries {
            *w /= norm;
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product of two sparse vectors (both sorted by index).
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// The fitted model. Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct TermWeightingModel {
    tokenizer: Tokenizer,
    /// Sorted vocabulary; a term's index is its position here
    terms: Vec<String>,
    idf: Vec<f64>,
    /// One row per catalog entry, in catalog order
    rows: Vec<SparseVector>,
}

impl TermWeightingModel {
    /// Fit the model over an ordered sequence of documents using the default
    /// English stop-word list. Never fails; an empty corpus gives an empty
    /// vocabulary and no rows.
    pub fn build<S: AsRef<str>>(documents: &[S]) -> Self {
        Self::build_with(Tokenizer::default(), documents)
    }

    pub fn build_with<S: AsRef<str>>(tokenizer: Tokenizer, documents: &[S]) -> Self {
        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|d| tokenizer.tokenize(d.as_ref()))
            .collect();

        let terms: Vec<String> = tokenized
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();

        let mut doc_freq = vec![0usize; terms.len()];
        for tokens in &tokenized {
            let unique: BTreeSet<usize> = tokens
                .iter()
                .filter_map(|t| terms.binary_search(t).ok())
                .collect();
            for idx in unique {
                doc_freq[idx] += 1;
            }
        }

        let n = documents.len() as f64;
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let mut model = Self {
            tokenizer,
            terms,
            idf,
            rows: Vec::with_capacity(tokenized.len()),
        };
        model.rows = tokenized.iter().map(|t| model.weigh(t)).collect();

        info!(
            documents = model.rows.len(),
            vocabulary = model.terms.len(),
            "Built term-weighting model"
        );

        model
    }

    /// Vectorize arbitrary text with the fitted vocabulary and weights.
    /// Terms outside the vocabulary contribute nothing.
    pub fn transform(&self, text: &str) -> SparseVector {
        self.weigh(&self.tokenizer.tokenize(text))
    }

    fn weigh(&self, tokens: &[String]) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokens {
            if let Ok(idx) = self.terms.binary_search(token) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }
        SparseVector::from_counts(counts, &self.idf)
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.terms
    }

    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.terms.binary_search_by(|t| t.as_str().cmp(term)).ok()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.term_index(term).map(|idx| self.idf[idx])
    }

    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_stop_words() -> Tokenizer {
        Tokenizer::with_stop_words(Vec::<String>::new())
    }

    #[test]
    fn test_vocabulary_is_sorted_and_deduplicated() {
        let model = TermWeightingModel::build_with(
            no_stop_words(),
            &["zeta alpha", "alpha beta", "beta"],
        );
        assert_eq!(model.vocabulary(), &["alpha", "beta", "zeta"]);
        assert_eq!(model.term_index("beta"), Some(1));
        assert_eq!(model.term_index("gamma"), None);
    }

    #[test]
    fn test_idf_downweights_common_terms() {
        let model = TermWeightingModel::build_with(
            no_stop_words(),
            &["common rare", "common", "common"],
        );
        let common = model.idf("common").unwrap();
        let rare = model.idf("rare").unwrap();
        // n=3: common df=3 -> ln(4/4)+1 = 1; rare df=1 -> ln(4/2)+1
        assert!((common - 1.0).abs() < 1e-12);
        assert!((rare - (2.0f64.ln() + 1.0)).abs() < 1e-12);
        assert!(rare > common);
    }

    #[test]
    fn test_rows_are_unit_length() {
        let model = TermWeightingModel::build_with(
            no_stop_words(),
            &["gradient descent gradient", "descent", "momentum"],
        );
        for row in model.rows() {
            let norm: f64 = row.entries().iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-12, "row norm was {norm}");
        }
    }

    #[test]
    fn test_empty_document_is_zero_row() {
        let model = TermWeightingModel::build_with(no_stop_words(), &["", "clustering"]);
        assert_eq!(model.len(), 2);
        assert!(model.rows()[0].is_zero());
        assert!(!model.rows()[1].is_zero());
    }

    #[test]
    fn test_empty_corpus_builds() {
        let model = TermWeightingModel::build::<&str>(&[]);
        assert!(model.is_empty());
        assert!(model.vocabulary().is_empty());
        assert!(model.transform("anything").is_zero());
    }

    #[test]
    fn test_transform_ignores_unseen_terms() {
        let model = TermWeightingModel::build_with(no_stop_words(), &["bayesian inference"]);
        assert!(model.transform("quantum chromodynamics").is_zero());
        let v = model.transform("bayesian quantum");
        assert_eq!(v.entries().len(), 1);
        assert!((v.entries()[0].1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let docs = ["convolutional networks", "recurrent networks", "attention"];
        let a = TermWeightingModel::build(&docs);
        let b = TermWeightingModel::build(&docs);
        assert_eq!(a.vocabulary(), b.vocabulary());
        assert_eq!(a.rows(), b.rows());
    }

    #[test]
    fn test_sparse_dot() {
        let a = SparseVector {
            entries: vec![(0, 0.6), (2, 0.8)],
        };
        let b = SparseVector {
            entries: vec![(1, 1.0), (2, 0.5)],
        };
        assert!((a.dot(&b) - 0.4).abs() < 1e-12);
        assert_eq!(a.dot(&SparseVector::default()), 0.0);
    }
}
