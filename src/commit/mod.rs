//! Commit message generation, quality gating, and improvement.

pub mod generator;
pub mod message;
pub mod prompt;
pub mod quality;

pub use generator::{derive_scopes, generate_message};
pub use message::ConventionalCommit;
pub use quality::{QualityVerdict, improve_message, judge_message};
