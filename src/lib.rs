//! commitsmith - A CLI tool that turns a staged git diff into a validated
//! conventional commit message and a changelog entry.
//!
//! # Overview
//!
//! commitsmith reads the staged diff from the current repository, uses the
//! Claude Code CLI to analyze each changed file and summarize the diff as
//! a whole, generates a conventional commit message, loops it through a
//! quality gate with a bounded number of improvement passes, and appends a
//! changelog section for the accepted message.

pub mod analysis;
pub mod changelog;
pub mod commit;
pub mod diff;
pub mod error;
pub mod git;
pub mod model;
pub mod workflow;

// Re-export commonly used types
pub use analysis::{CommitType, DiffAnalysis};
pub use commit::{ConventionalCommit, QualityVerdict};
pub use diff::{ChangeType, FileChange, Hunk};
pub use error::{ChangelogError, GitError, ModelError, WorkflowError};
pub use model::{ClaudeClient, ModelClient, ModelRequest};
pub use workflow::{Workflow, WorkflowOutcome};
