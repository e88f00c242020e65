//! Production model client backed by the Claude Code CLI.

use std::env;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::ModelError;
use crate::model::retry::retry_with_backoff;
use crate::model::{ModelClient, ModelRequest};

/// Default timeout for model subprocess execution (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Environment variable to override the default timeout.
const TIMEOUT_ENV_VAR: &str = "COMMITSMITH_MODEL_TIMEOUT";

/// Get the configured timeout duration.
///
/// Reads from COMMITSMITH_MODEL_TIMEOUT if set, otherwise uses the
/// default of 300 seconds. Logs a warning for invalid values.
fn get_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}

/// Check if the Claude Code CLI is installed and accessible.
///
/// Uses the `which` crate for cross-platform executable detection.
pub async fn check_model_installed() -> Result<(), ModelError> {
    if which::which("claude").is_err() {
        return Err(ModelError::NotInstalled);
    }

    let version_check = Command::new("claude")
        .arg("--version")
        .output()
        .await
        .map_err(ModelError::SpawnFailed)?;

    if !version_check.status.success() {
        return Err(ModelError::NotInstalled);
    }

    Ok(())
}

/// Run the CLI with a prompt and return its raw stdout.
///
/// Uses the -p flag for the prompt and --output-format json, which wraps
/// the completion in a JSON envelope. The subprocess is bounded by
/// [`get_timeout`]; the workflow adds no timeout of its own.
async fn run_model(prompt: &str) -> Result<String, ModelError> {
    let timeout_duration = get_timeout();
    let timeout_secs = timeout_duration.as_secs();

    let output = timeout(
        timeout_duration,
        Command::new("claude")
            .arg("-p")
            .arg(prompt)
            .arg("--output-format")
            .arg("json")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output(),
    )
    .await
    .map_err(|_| ModelError::Timeout(timeout_secs))?
    .map_err(ModelError::SpawnFailed)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);
        return Err(ModelError::NonZeroExit { code, stderr });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// CLI JSON envelope produced by --output-format json.
#[derive(serde::Deserialize)]
struct CliEnvelope {
    result: String,
    #[serde(default)]
    is_error: bool,
}

/// Unwrap the CLI's JSON envelope, falling back to the raw response when
/// no envelope is present.
fn unwrap_envelope(response: &str) -> Result<String, ModelError> {
    match serde_json::from_str::<CliEnvelope>(response) {
        Ok(envelope) if envelope.is_error => Err(ModelError::ExecutionFailed(envelope.result)),
        Ok(envelope) => Ok(envelope.result),
        Err(_) => Ok(response.to_string()),
    }
}

/// Model client that shells out to the Claude Code CLI.
///
/// Transport failures are retried with exponential backoff (3 attempts)
/// before surfacing as [`ModelError::RetriesExhausted`]. When a request
/// declares a JSON shape, the shape is folded into the prompt as a strict
/// output instruction.
#[derive(Debug, Default)]
pub struct ClaudeClient;

impl ClaudeClient {
    pub fn new() -> Self {
        Self
    }

    fn final_prompt(request: &ModelRequest) -> String {
        match &request.schema {
            Some(schema) => format!(
                "{}\n\nRespond with ONLY a single JSON object conforming to this shape \
                 (no markdown, no explanation):\n{}",
                request.prompt, schema
            ),
            None => request.prompt.clone(),
        }
    }
}

#[async_trait]
impl ModelClient for ClaudeClient {
    async fn invoke(&self, request: &ModelRequest) -> Result<String, ModelError> {
        let prompt = Self::final_prompt(request);
        debug!("Invoking model, prompt length {} chars", prompt.len());

        let response = retry_with_backoff(|| run_model(&prompt)).await?;
        unwrap_envelope(&response)
    }
}
