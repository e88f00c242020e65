//! Typed payload parsing for model completions.
//!
//! Completions rarely arrive as clean JSON: the CLI wraps them in
//! markdown fences or pads them with conversational text. Rather than
//! handing callers a cleaned-up string, this module deserializes straight
//! into the requested payload type, trying progressively messier
//! interpretations of the completion until one fits.

use serde::de::DeserializeOwned;

use crate::error::ModelError;

/// Deserialize a completion into `T`.
///
/// Tries, in order: the completion as-is, the contents of the first
/// markdown code fence, and every balanced `{...}` object found in the
/// text. The first candidate that deserializes into `T` wins, so prose
/// or unrelated objects around the payload are skipped.
pub fn parse_payload<T: DeserializeOwned>(completion: &str) -> Result<T, ModelError> {
    let trimmed = completion.trim();

    if let Ok(value) = serde_json::from_str::<T>(trimmed) {
        return Ok(value);
    }

    if let Some(fenced) = fenced_block(trimmed)
        && let Ok(value) = serde_json::from_str::<T>(fenced)
    {
        return Ok(value);
    }

    for candidate in candidate_objects(trimmed) {
        if let Ok(value) = serde_json::from_str::<T>(candidate) {
            return Ok(value);
        }
    }

    Err(ModelError::InvalidJson(format!(
        "No usable JSON payload in response: {}",
        truncate(trimmed, 200)
    )))
}

/// The contents of the first markdown code fence, tolerating an optional
/// `json` language tag.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")? + 3;
    let rest = text[start..].strip_prefix("json").unwrap_or(&text[start..]);
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

/// Every balanced top-level `{...}` slice in the text, in order of
/// appearance.
fn candidate_objects(text: &str) -> impl Iterator<Item = &str> {
    text.match_indices('{')
        .filter_map(move |(start, _)| balanced_object(&text[start..]))
}

/// The shortest balanced `{...}` prefix of `text`, tracking brace depth
/// outside string literals so braces and escaped quotes inside values do
/// not end the object early.
fn balanced_object(text: &str) -> Option<&str> {
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }

        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[..=idx]);
                }
            }
            _ => {}
        }
    }

    None
}

fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
