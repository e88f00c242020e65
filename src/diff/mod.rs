//! Staged-diff parsing into structured change records.

pub mod parser;
pub mod types;

pub use parser::{extract_file_diff, parse_diff};
pub use types::{ChangeType, FileChange, Hunk};
