pub mod analyze;
pub mod recommend;
pub mod summarize;
