//! Per-file purpose analysis and whole-diff summarization.

pub mod analyzer;
pub mod prompt;
pub mod summarizer;
pub mod types;

pub use analyzer::analyze_files;
pub use summarizer::summarize_changes;
pub use types::{CommitType, DiffAnalysis};
