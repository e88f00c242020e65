//! Error types for commitsmith modules using thiserror.

use thiserror::Error;

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("No staged changes found. Stage changes with 'git add' first.")]
    NoStagedChanges,

    #[error("Failed to collect staged diff: {0}")]
    DiffFailed(#[source] git2::Error),

    #[error("Failed to create commit: {0}")]
    CommitFailed(#[source] git2::Error),

    #[error("Git config error (missing user.name or user.email): {0}")]
    ConfigError(#[source] git2::Error),
}

/// Errors from language-model invocations.
///
/// These are transport-level failures: once one escapes a workflow step
/// the session ends. Malformed-but-delivered completions are handled by
/// each step's own fallback policy instead.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Claude Code CLI not found. Install with: npm install -g @anthropic-ai/claude-code")]
    NotInstalled,

    #[error("Model CLI failed to execute: {0}")]
    ExecutionFailed(String),

    #[error("Failed to spawn model process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Model returned invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Model process timed out after {0} seconds")]
    Timeout(u64),

    #[error("Model CLI exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("All retry attempts failed: {0}")]
    RetriesExhausted(#[source] Box<ModelError>),
}

/// Errors from changelog operations.
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Failed to open changelog at {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to append to changelog at {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level workflow errors.
///
/// Quality rejection is not represented here: it is ordinary control flow
/// inside the quality loop, never an error.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("No staged changes to analyze")]
    NoStagedChanges,

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Changelog(#[from] ChangelogError),
}
