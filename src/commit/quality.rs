//! Binary quality judgment and message improvement.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::commit::prompt::{build_improve_prompt, build_quality_prompt};
use crate::error::ModelError;
use crate::model::{ModelClient, ModelRequest, parse_payload};

/// The gate's verdict on a rendered commit message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QualityVerdict {
    pub is_valid: bool,
}

impl QualityVerdict {
    pub fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "is_valid": {"type": "boolean"}
            },
            "required": ["is_valid"]
        })
    }
}

/// Ask the model whether the rendered message is an acceptable
/// conventional commit. A payload that does not carry the verdict shape
/// is fatal.
pub async fn judge_message(
    model: &dyn ModelClient,
    message: &str,
) -> Result<QualityVerdict, ModelError> {
    let request = ModelRequest::structured(build_quality_prompt(message), QualityVerdict::schema());
    let completion = model.invoke(&request).await?;

    let verdict: QualityVerdict = parse_payload(&completion)?;
    debug!(is_valid = verdict.is_valid, "Quality verdict received");
    Ok(verdict)
}

/// Ask the model to rewrite a message the gate rejected, given the
/// rejecting verdict. The completion is plain text; surrounding
/// whitespace is trimmed, nothing else is validated here because the
/// rewrite goes straight back through the gate.
pub async fn improve_message(
    model: &dyn ModelClient,
    message: &str,
    verdict: QualityVerdict,
) -> Result<String, ModelError> {
    debug!(is_valid = verdict.is_valid, "Requesting rewrite of rejected message");
    let request = ModelRequest::text(build_improve_prompt(message));
    let completion = model.invoke(&request).await?;
    Ok(completion.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedModel(&'static str);

    #[async_trait]
    impl ModelClient for FixedModel {
        async fn invoke(&self, _request: &ModelRequest) -> Result<String, ModelError> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn test_judge_accepts() {
        let model = FixedModel(r#"{"is_valid": true}"#);
        let verdict = judge_message(&model, "feat(auth): add login").await.unwrap();
        assert!(verdict.is_valid);
    }

    #[tokio::test]
    async fn test_judge_rejects() {
        let model = FixedModel(r#"{"is_valid": false}"#);
        let verdict = judge_message(&model, "Fixed stuff.").await.unwrap();
        assert!(!verdict.is_valid);
    }

    #[tokio::test]
    async fn test_judge_unwraps_fenced_payload() {
        let model = FixedModel("```json\n{\"is_valid\": true}\n```");
        let verdict = judge_message(&model, "fix: handle timeout").await.unwrap();
        assert!(verdict.is_valid);
    }

    #[tokio::test]
    async fn test_malformed_verdict_is_fatal() {
        let model = FixedModel("looks fine to me");
        let result = judge_message(&model, "feat: add thing").await;
        assert!(matches!(result, Err(ModelError::InvalidJson(_))));
    }

    #[tokio::test]
    async fn test_improve_trims_completion() {
        let model = FixedModel("\n  fix(parser): handle empty input  \n");
        let rejected = QualityVerdict { is_valid: false };
        let improved = improve_message(&model, "Fixed the parser.", rejected)
            .await
            .unwrap();
        assert_eq!(improved, "fix(parser): handle empty input");
    }
}
