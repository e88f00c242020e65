//! Analysis types shared by the summarizer and message generator.

use serde::{Deserialize, Deserializer, Serialize};

use crate::diff::FileChange;

/// Conventional commit types, the closed classification set.
///
/// Serializes to lowercase (e.g., `"feat"`). Deserializes
/// case-insensitively so sloppy model output like `"Fix"` still parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Refactor,
    Test,
    Chore,
    Style,
    Perf,
}

impl CommitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feat => "feat",
            Self::Fix => "fix",
            Self::Docs => "docs",
            Self::Refactor => "refactor",
            Self::Test => "test",
            Self::Chore => "chore",
            Self::Style => "style",
            Self::Perf => "perf",
        }
    }

    /// The full set, for prompt instructions and validation messages.
    pub fn all() -> &'static [CommitType] {
        &[
            Self::Feat,
            Self::Fix,
            Self::Docs,
            Self::Refactor,
            Self::Test,
            Self::Chore,
            Self::Style,
            Self::Perf,
        ]
    }

    /// Pipe-separated list of valid type names.
    pub fn valid_set() -> String {
        Self::all()
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl std::fmt::Display for CommitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CommitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "feat" => Ok(Self::Feat),
            "fix" => Ok(Self::Fix),
            "docs" => Ok(Self::Docs),
            "refactor" => Ok(Self::Refactor),
            "test" => Ok(Self::Test),
            "chore" => Ok(Self::Chore),
            "style" => Ok(Self::Style),
            "perf" => Ok(Self::Perf),
            _ => Err(format!("Unknown commit type: {}", s)),
        }
    }
}

impl<'de> Deserialize<'de> for CommitType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<CommitType>().map_err(serde::de::Error::custom)
    }
}

/// Aggregated analysis of one staged diff.
///
/// `files` is always non-empty: the workflow refuses to run on an empty
/// diff before the summarizer is ever reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffAnalysis {
    pub summary: String,
    pub change_type: CommitType,
    pub files: Vec<FileChange>,
    #[serde(default)]
    pub breaking_change: bool,
}
