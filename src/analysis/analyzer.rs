//! Per-file purpose analysis.

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::analysis::prompt::build_purpose_prompt;
use crate::diff::{ChangeType, FileChange, extract_file_diff};
use crate::error::ModelError;
use crate::model::{ModelClient, ModelRequest, parse_payload};

/// The single-field shape requested for per-file purposes.
#[derive(Debug, Deserialize)]
struct PurposeResponse {
    purpose: String,
}

impl PurposeResponse {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "purpose": {"type": "string"}
            },
            "required": ["purpose"]
        })
    }
}

/// Derive a natural-language purpose for every file change.
///
/// Binary entries get a fixed templated purpose and skip the model call.
/// A malformed completion or an absent `purpose` field is absorbed with a
/// templated fallback, so every file always ends up with a purpose.
/// Transport failures propagate and end the session.
pub async fn analyze_files(
    model: &dyn ModelClient,
    full_diff: &str,
    mut changes: Vec<FileChange>,
) -> Result<Vec<FileChange>, ModelError> {
    for change in &mut changes {
        if change.change_type == ChangeType::Binary {
            change.purpose = fallback_purpose(change);
            debug!("Skipping model call for binary file {}", change.path);
            continue;
        }

        let file_diff = extract_file_diff(full_diff, &change.path);
        let request =
            ModelRequest::structured(build_purpose_prompt(change, &file_diff), PurposeResponse::schema());

        let completion = model.invoke(&request).await?;
        change.purpose = match parse_payload::<PurposeResponse>(&completion) {
            Ok(response) if !response.purpose.trim().is_empty() => response.purpose,
            _ => {
                warn!(
                    "Malformed purpose response for {}, using templated fallback",
                    change.path
                );
                fallback_purpose(change)
            }
        };
    }

    Ok(changes)
}

/// Generic templated purpose derived from path and change type.
fn fallback_purpose(change: &FileChange) -> String {
    match change.change_type {
        ChangeType::New => format!("Add new file {}", change.path),
        ChangeType::Deleted => format!("Delete {}", change.path),
        ChangeType::Renamed => match &change.old_path {
            Some(old) => format!("Rename {} to {}", old, change.path),
            None => format!("Rename {}", change.path),
        },
        ChangeType::ModeChanged => format!("Change file mode of {}", change.path),
        ChangeType::Binary => format!("Update binary file {}", change.path),
        ChangeType::Submodule => format!("Update submodule {}", change.path),
        ChangeType::Conflict => format!("Resolve conflicts in {}", change.path),
        ChangeType::Modified => format!("Update {}", change.path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted model that pops canned responses in order.
    struct ScriptedModel {
        responses: Mutex<Vec<Result<String, ModelError>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedModel {
        fn new(responses: Vec<Result<String, ModelError>>) -> Self {
            let mut reversed = responses;
            reversed.reverse();
            Self {
                responses: Mutex::new(reversed),
                calls: Mutex::new(0),
            }
        }

        fn call_count(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedModel {
        async fn invoke(&self, _request: &ModelRequest) -> Result<String, ModelError> {
            *self.calls.lock().unwrap() += 1;
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(ModelError::ExecutionFailed("script exhausted".into())))
        }
    }

    fn change(path: &str, change_type: ChangeType) -> FileChange {
        FileChange::new(path, change_type)
    }

    #[tokio::test]
    async fn test_purpose_extracted_from_valid_response() {
        let model = ScriptedModel::new(vec![Ok(r#"{"purpose": "Add login handler"}"#.into())]);
        let changes = vec![change("src/login.rs", ChangeType::New)];

        let analyzed = analyze_files(&model, "", changes).await.unwrap();
        assert_eq!(analyzed[0].purpose, "Add login handler");
    }

    #[tokio::test]
    async fn test_malformed_response_falls_back_to_template() {
        let model = ScriptedModel::new(vec![Ok("not json at all".into())]);
        let changes = vec![change("src/login.rs", ChangeType::Modified)];

        let analyzed = analyze_files(&model, "", changes).await.unwrap();
        assert_eq!(analyzed[0].purpose, "Update src/login.rs");
    }

    #[tokio::test]
    async fn test_missing_purpose_field_falls_back() {
        let model = ScriptedModel::new(vec![Ok(r#"{"other": "field"}"#.into())]);
        let changes = vec![change("docs/guide.md", ChangeType::Deleted)];

        let analyzed = analyze_files(&model, "", changes).await.unwrap();
        assert_eq!(analyzed[0].purpose, "Delete docs/guide.md");
    }

    #[tokio::test]
    async fn test_binary_file_skips_model_call() {
        let model = ScriptedModel::new(vec![]);
        let changes = vec![change("assets/logo.png", ChangeType::Binary)];

        let analyzed = analyze_files(&model, "", changes).await.unwrap();
        assert_eq!(analyzed[0].purpose, "Update binary file assets/logo.png");
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let model = ScriptedModel::new(vec![Err(ModelError::Timeout(300))]);
        let changes = vec![change("src/app.rs", ChangeType::Modified)];

        let result = analyze_files(&model, "", changes).await;
        assert!(matches!(result, Err(ModelError::Timeout(300))));
    }

    #[tokio::test]
    async fn test_rename_fallback_mentions_both_paths() {
        let model = ScriptedModel::new(vec![Ok("garbage".into())]);
        let mut renamed = change("src/new.rs", ChangeType::Renamed);
        renamed.old_path = Some("src/old.rs".to_string());

        let analyzed = analyze_files(&model, "", vec![renamed]).await.unwrap();
        assert_eq!(analyzed[0].purpose, "Rename src/old.rs to src/new.rs");
    }
}
