//! The conventional commit message shape and its rendering.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::analysis::CommitType;

/// A structured conventional commit message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConventionalCommit {
    #[serde(rename = "type")]
    pub commit_type: CommitType,
    pub scope: Option<String>,
    pub description: String,
    #[serde(default)]
    pub breaking: bool,
    pub body: Option<String>,
    pub footer: Option<String>,
}

impl ConventionalCommit {
    /// JSON shape for structured message requests.
    pub fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "type": {"type": "string", "enum": CommitType::all().iter().map(|t| t.as_str()).collect::<Vec<_>>()},
                "scope": {"type": ["string", "null"]},
                "description": {"type": "string"},
                "breaking": {"type": "boolean"},
                "body": {"type": ["string", "null"]},
                "footer": {"type": ["string", "null"]}
            },
            "required": ["type", "description"]
        })
    }

    /// Render the message: `type(scope)!: description`, then optional
    /// body and footer, each separated by a blank line.
    ///
    /// This is a pure function of the struct fields: identical input
    /// always yields a byte-identical string.
    pub fn render(&self) -> String {
        let mut message = self.commit_type.as_str().to_string();

        if let Some(scope) = &self.scope
            && !scope.is_empty()
        {
            message.push('(');
            message.push_str(scope);
            message.push(')');
        }
        if self.breaking {
            message.push('!');
        }
        message.push_str(": ");
        message.push_str(&self.description);

        if let Some(body) = &self.body
            && !body.trim().is_empty()
        {
            message.push_str("\n\n");
            message.push_str(body.trim());
        }
        if let Some(footer) = &self.footer
            && !footer.trim().is_empty()
        {
            message.push_str("\n\n");
            message.push_str(footer.trim());
        }

        message
    }
}
