// Similarity core: TF-IDF model over catalog subtopics and cosine ranking.

pub mod model;
pub mod rank;
pub mod tokenize;

pub use model::{SparseVector, TermWeightingModel};
pub use rank::{rank, RankedRow};
pub use tokenize::Tokenizer;
