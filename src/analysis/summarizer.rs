//! Aggregate per-file purposes into one overall diff analysis.

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::analysis::prompt::{build_summary_prompt, build_summary_retry_prompt};
use crate::analysis::types::{CommitType, DiffAnalysis};
use crate::diff::FileChange;
use crate::error::ModelError;
use crate::model::{ModelClient, ModelRequest, parse_payload};

/// The analysis fields requested from the model; the file list is merged
/// in afterwards from the already-computed changes.
#[derive(Debug, Deserialize)]
struct SummaryResponse {
    summary: String,
    change_type: String,
    #[serde(default)]
    breaking_change: bool,
}

impl SummaryResponse {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "summary": {"type": "string"},
                "change_type": {"type": "string", "enum": CommitType::all().iter().map(|t| t.as_str()).collect::<Vec<_>>()},
                "breaking_change": {"type": "boolean"}
            },
            "required": ["summary", "change_type"]
        })
    }
}

/// A parsed summary with the change type revalidated against the closed
/// set; `change_type` is None when the model produced an out-of-set value.
struct ParsedSummary {
    summary: String,
    change_type: Option<CommitType>,
    breaking_change: bool,
}

/// Combine all per-file purposes into one [`DiffAnalysis`].
///
/// A malformed payload or an out-of-set change type triggers exactly one
/// retry request; if the retry is still invalid the classification
/// defaults to `chore`. Transport failures propagate.
pub async fn summarize_changes(
    model: &dyn ModelClient,
    files: Vec<FileChange>,
) -> Result<DiffAnalysis, ModelError> {
    let request = ModelRequest::structured(build_summary_prompt(&files), SummaryResponse::schema());
    let completion = model.invoke(&request).await?;

    let first = parse_summary(&completion);
    if let Some(parsed) = &first
        && let Some(change_type) = parsed.change_type
    {
        return Ok(build_analysis(parsed.summary.clone(), change_type, parsed.breaking_change, files));
    }

    warn!("Summary response invalid, retrying once with restated type set");
    let retry_request =
        ModelRequest::structured(build_summary_retry_prompt(&files), SummaryResponse::schema());
    let retry_completion = model.invoke(&retry_request).await?;

    match parse_summary(&retry_completion) {
        Some(parsed) => {
            let change_type = parsed.change_type.unwrap_or_else(|| {
                warn!("Change type still out of set after retry, defaulting to chore");
                CommitType::Chore
            });
            Ok(build_analysis(parsed.summary, change_type, parsed.breaking_change, files))
        }
        None => {
            // Salvage whatever the first response carried, else template.
            warn!("Summary response unparseable after retry, using fallback analysis");
            let summary = first
                .map(|p| p.summary)
                .unwrap_or_else(|| fallback_summary(&files));
            Ok(build_analysis(summary, CommitType::Chore, false, files))
        }
    }
}

fn build_analysis(
    summary: String,
    change_type: CommitType,
    breaking_change: bool,
    files: Vec<FileChange>,
) -> DiffAnalysis {
    DiffAnalysis {
        summary,
        change_type,
        files,
        breaking_change,
    }
}

fn parse_summary(completion: &str) -> Option<ParsedSummary> {
    let response: SummaryResponse = parse_payload(completion).ok()?;
    Some(ParsedSummary {
        change_type: response.change_type.parse::<CommitType>().ok(),
        summary: response.summary,
        breaking_change: response.breaking_change,
    })
}

fn fallback_summary(files: &[FileChange]) -> String {
    let word = if files.len() == 1 { "file" } else { "files" };
    format!("Update {} {}", files.len(), word)
}
