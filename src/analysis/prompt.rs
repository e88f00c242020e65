//! Prompt construction for file-purpose and summary requests.

use crate::analysis::types::CommitType;
use crate::diff::FileChange;

/// Maximum characters of diff text included in a single prompt.
pub const MAX_DIFF_PROMPT_LENGTH: usize = 30_000;

/// Build the per-file purpose prompt from the change metadata and the
/// file-scoped diff slice.
pub fn build_purpose_prompt(change: &FileChange, file_diff: &str) -> String {
    let diff = sanitize_for_prompt(file_diff, MAX_DIFF_PROMPT_LENGTH);

    format!(
        r#"Act as an expert software engineer. Analyze this specific file change and provide a purpose description.

File: {path}
Type: {change_type}
Lines: +{added} -{removed}

Content from diff:
```
{diff}
```

Provide a concise, technical purpose description that explains:
1. What exactly changed in this file
2. Why this change was made (based on code context)
3. How it fits into the overall changes

Use precise, senior-level technical language.

Respond with ONLY a JSON object: {{"purpose": "description here"}}"#,
        path = change.path,
        change_type = change.change_type,
        added = change.added_lines,
        removed = change.removed_lines,
    )
}

/// Build the whole-diff summary prompt from per-file purposes.
pub fn build_summary_prompt(files: &[FileChange]) -> String {
    let changes_overview: String = files
        .iter()
        .map(|f| {
            format!(
                "- {}: {} (+{}/-{} lines)",
                f.path, f.change_type, f.added_lines, f.removed_lines
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let purposes: String = files
        .iter()
        .map(|f| format!("- {}: {}", f.path, f.purpose))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Act as an expert software engineer. Analyze these parsed git changes and provide a technical summary.

## Changes Overview
{changes_overview}

## Detailed File Purposes
{purposes}

Based on these changes:
1. Write a brief technical summary (2-3 sentences)
2. Determine the primary change type: one of {valid_types}
3. IMPORTANT: Decide whether there are any breaking changes (API changes, schema changes, removed behavior)

Consider the overall pattern of changes, the relationships between changed
files, and the primary purpose of the work.

Respond with ONLY a JSON object: {{"summary": "...", "change_type": "{example_type}", "breaking_change": false}}"#,
        valid_types = CommitType::valid_set(),
        example_type = CommitType::Feat,
    )
}

/// Follow-up prompt after a malformed or out-of-set summary response.
pub fn build_summary_retry_prompt(files: &[FileChange]) -> String {
    format!(
        "{}\n\nYour previous response was not valid. The change_type field MUST be exactly one of: {}.",
        build_summary_prompt(files),
        CommitType::valid_set(),
    )
}

/// Sanitize free text for inclusion in a model prompt.
///
/// Strips control characters (keeping newlines and tabs) and truncates to
/// `max_len` at a char boundary.
pub fn sanitize_for_prompt(text: &str, max_len: usize) -> String {
    let mut result: String = text
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();

    if result.len() > max_len {
        let mut end = max_len;
        while end > 0 && !result.is_char_boundary(end) {
            end -= 1;
        }
        result.truncate(end);
    }

    result
}
