//! Conventional commit message generation from a diff analysis.

use std::collections::BTreeSet;

use tracing::debug;

use crate::analysis::DiffAnalysis;
use crate::commit::message::ConventionalCommit;
use crate::commit::prompt::build_message_prompt;
use crate::error::ModelError;
use crate::model::{ModelClient, ModelRequest, parse_payload};

/// Derive candidate scopes from the first path segment of each changed
/// file, deduplicated and sorted. Single-segment paths (top-level files)
/// contribute no scope.
pub fn derive_scopes(analysis: &DiffAnalysis) -> Vec<String> {
    let scopes: BTreeSet<String> = analysis
        .files
        .iter()
        .filter_map(|f| {
            let mut parts = f.path.split('/');
            let first = parts.next()?;
            parts.next().map(|_| first.to_string())
        })
        .collect();

    scopes.into_iter().collect()
}

/// Generate a [`ConventionalCommit`] for the analysis.
///
/// The model's `breaking` field is unconditionally overwritten with the
/// analysis-derived value: the analysis is authoritative on that point.
/// A completion that does not conform to the ConventionalCommit shape is
/// fatal.
pub async fn generate_message(
    model: &dyn ModelClient,
    analysis: &DiffAnalysis,
) -> Result<ConventionalCommit, ModelError> {
    let scopes = derive_scopes(analysis);
    debug!("Candidate scopes: {:?}", scopes);

    let request = ModelRequest::structured(
        build_message_prompt(analysis, &scopes),
        ConventionalCommit::schema(),
    );
    let completion = model.invoke(&request).await?;

    let mut commit: ConventionalCommit = parse_payload(&completion)?;
    commit.breaking = analysis.breaking_change;
    Ok(commit)
}
