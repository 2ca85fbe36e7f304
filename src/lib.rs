// learnpath: weak-topic analysis and subtopic recommendations for learners
//
// This is the library root. `performance` and `similarity` are the pure
// core; `catalog`, `recommend` and `summarize` build on them, and
// `collaborators` holds the network-facing seams.

pub mod catalog;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod output;
pub mod performance;
pub mod recommend;
pub mod similarity;
pub mod summarize;

#[cfg(feature = "web")]
pub mod web;
