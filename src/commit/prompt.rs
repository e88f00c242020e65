//! Prompt construction for message generation, quality judgment, and
//! message improvement.

use crate::analysis::{CommitType, DiffAnalysis};

/// Build the structured commit-message prompt from the analysis and the
/// derived candidate scopes.
pub fn build_message_prompt(analysis: &DiffAnalysis, scopes: &[String]) -> String {
    let analysis_json =
        serde_json::to_string_pretty(analysis).unwrap_or_else(|_| analysis.summary.clone());

    let breaking_note = if analysis.breaking_change { "" } else { " NOT" };
    let scope_list = if scopes.is_empty() {
        "none detected".to_string()
    } else {
        scopes.join(", ")
    };

    format!(
        r#"Act as an expert software engineer. Generate a concise Conventional Commit message for this analysis:

{analysis_json}

Note: This change is{breaking_note} a breaking change.
Detected possible scopes from paths: {scope_list}

STRICT COMMIT RULES:
1. Format: `<type>(<scope>): <imperative-verb> <what-and-why>`
   - If breaking change: `<type>(<scope>)!: <description>`
   - Scope should be one of: {scope_list}
   - The ENTIRE subject MUST be under 50 characters total

2. Types: {valid_types}

3. Description MUST:
   - START with an IMPERATIVE verb (add/implement/update/fix)
   - NOT capitalize the first letter
   - Be specific about WHAT is being changed
   - NOT end with a period
   - Use imperative mood (NO: added/implemented/fixed)

Respond with ONLY a JSON object following the ConventionalCommit shape."#,
        valid_types = CommitType::valid_set(),
    )
}

/// Build the binary validity-judgment prompt.
///
/// Deliberately lenient: the gate asks for a judgment call, not a
/// hard-coded format check.
pub fn build_quality_prompt(message: &str) -> String {
    format!(
        r#"Act as a Conventional Commits expert. Check if this commit message is valid:

Commit Message: {message}

VALIDATION RULES:
1. Format must be: `<type>[optional_scope]: <description>`
   - type: {valid_types}
   - scope: OPTIONAL, in parentheses
   - description: imperative mood, first letter lowercase

2. Breaking changes add `!` before the colon.

3. Common issues: wrong type, past tense, far too long, non-imperative
   mood, capitalized first letter.

Give a binary true/false score indicating whether the commit message is
valid. Don't be very strict.

Respond with ONLY a JSON object: {{"is_valid": true}}"#,
        valid_types = CommitType::valid_set(),
    )
}

/// Build the rewrite prompt for a rejected message.
pub fn build_improve_prompt(message: &str) -> String {
    format!(
        r#"Act as an expert software engineer. Fix this commit message:

Original Message: {message}

STRICT RULES:
1. Format: `<type>(<scope>): <description>`
2. Must use imperative mood (add/fix/update)
3. scope: OPTIONAL, in parentheses
4. Must be under 50 characters
5. Must be specific and technical
6. ONLY the first letter must be lowercase
7. NO duplicate information in scope and description

Return ONLY the final commit message as plain text, nothing else."#
    )
}
