//! Structured per-file change records parsed from a staged diff.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a single file's change within a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    New,
    Deleted,
    Renamed,
    ModeChanged,
    Modified,
    Binary,
    Submodule,
    Conflict,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Deleted => "DELETED",
            Self::Renamed => "RENAMED",
            Self::ModeChanged => "MODE_CHANGED",
            Self::Modified => "MODIFIED",
            Self::Binary => "BINARY",
            Self::Submodule => "SUBMODULE",
            Self::Conflict => "CONFLICT",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contiguous block of changed lines with old/new line ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    pub old_start: u32,
    pub old_lines: u32,
    pub new_start: u32,
    pub new_lines: u32,
    pub added_lines: u32,
    pub removed_lines: u32,
    pub context_lines: u32,
}

/// A file that was changed in the staged diff.
///
/// `added_lines` and `removed_lines` always equal the sums of the
/// corresponding per-hunk counts. `purpose` stays empty until the file
/// analyzer fills it in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub change_type: ChangeType,
    /// Old path for renamed files (None for every other change type).
    pub old_path: Option<String>,
    pub added_lines: u32,
    pub removed_lines: u32,
    pub hunks: Vec<Hunk>,
    #[serde(default)]
    pub purpose: String,
}

impl FileChange {
    pub fn new(path: impl Into<String>, change_type: ChangeType) -> Self {
        Self {
            path: path.into(),
            change_type,
            old_path: None,
            added_lines: 0,
            removed_lines: 0,
            hunks: Vec::new(),
            purpose: String::new(),
        }
    }
}
