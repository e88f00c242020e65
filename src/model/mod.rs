//! Language-model collaborator: request shapes, client trait, and the
//! production subprocess client.

pub mod claude;
pub mod json;
pub mod retry;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ModelError;

pub use claude::{ClaudeClient, check_model_installed};
pub use json::parse_payload;

/// A single model request: a prompt plus an optional JSON shape the
/// completion must conform to.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub prompt: String,
    pub schema: Option<Value>,
}

impl ModelRequest {
    /// A free-text request with no declared shape.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            schema: None,
        }
    }

    /// A structured request constrained to the given JSON shape.
    pub fn structured(prompt: impl Into<String>, schema: Value) -> Self {
        Self {
            prompt: prompt.into(),
            schema: Some(schema),
        }
    }
}

/// Synchronous-in-spirit model invocation: one prompt in, one completion
/// out. Implementations own their transport policy (timeouts, retries);
/// the workflow imposes none of its own.
///
/// Implemented by [`ClaudeClient`] in production and by scripted fakes in
/// tests, so every workflow step can run deterministically.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn invoke(&self, request: &ModelRequest) -> Result<String, ModelError>;
}
