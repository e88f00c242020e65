//! Session state carried through the workflow: the attempt ledger and
//! the timestamped event log.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::DiffAnalysis;
use crate::commit::QualityVerdict;

/// Maximum number of improvement passes before the current candidate is
/// force-accepted.
pub const MAX_ATTEMPTS: u32 = 5;

/// How an attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    /// Rejected by the quality gate.
    Failed,
    /// Produced by an improvement pass, pending re-judgment.
    Improved,
    /// Accepted, or force-accepted after the budget ran out.
    Final,
}

/// One row of the attempt ledger.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptRecord {
    pub attempt: u32,
    pub message: String,
    pub verdict: Option<QualityVerdict>,
    pub status: AttemptStatus,
}

/// A timestamped workflow event, for verbose session traces.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowEvent {
    pub at: DateTime<Utc>,
    pub step: &'static str,
    pub detail: String,
}

/// Mutable session state threaded through the workflow steps.
#[derive(Debug, Default)]
pub struct AgentState {
    /// Improvement passes consumed so far.
    pub attempts: u32,
    pub ledger: Vec<AttemptRecord>,
    pub events: Vec<WorkflowEvent>,
    /// Set once the summarizer has run.
    pub analysis: Option<DiffAnalysis>,
    /// Set only on terminal acceptance.
    pub final_message: Option<String>,
}

impl AgentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, message: &str, verdict: Option<QualityVerdict>, status: AttemptStatus) {
        self.ledger.push(AttemptRecord {
            attempt: self.attempts,
            message: message.to_string(),
            verdict,
            status,
        });
    }

    pub fn log_event(&mut self, step: &'static str, detail: impl Into<String>) {
        self.events.push(WorkflowEvent {
            at: Utc::now(),
            step,
            detail: detail.into(),
        });
    }

    /// True once every improvement pass has been spent.
    pub fn budget_exhausted(&self) -> bool {
        self.attempts >= MAX_ATTEMPTS
    }
}
