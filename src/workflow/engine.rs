//! The commit-message workflow: parse, analyze, summarize, generate,
//! then loop the quality gate against the improver until acceptance or
//! budget exhaustion, and finally emit the changelog section.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::analysis::{DiffAnalysis, analyze_files, summarize_changes};
use crate::changelog::{append_section, format_section};
use crate::commit::{generate_message, improve_message, judge_message};
use crate::diff::parse_diff;
use crate::error::WorkflowError;
use crate::model::ModelClient;
use crate::workflow::state::{AgentState, AttemptStatus};

/// Workflow step labels, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    ParseDiff,
    AnalyzeFiles,
    Summarize,
    GenerateMessage,
    CheckQuality,
    ImproveMessage,
    EmitChangelog,
}

impl WorkflowStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStep::ParseDiff => "parse_diff",
            WorkflowStep::AnalyzeFiles => "analyze_files",
            WorkflowStep::Summarize => "summarize",
            WorkflowStep::GenerateMessage => "generate_message",
            WorkflowStep::CheckQuality => "check_quality",
            WorkflowStep::ImproveMessage => "improve_message",
            WorkflowStep::EmitChangelog => "emit_changelog",
        }
    }
}

/// The result of a completed workflow run.
#[derive(Debug)]
pub struct WorkflowOutcome {
    /// The accepted commit message, rendered.
    pub message: String,
    pub analysis: DiffAnalysis,
    pub state: AgentState,
}

/// Drives one diff through the full message workflow.
pub struct Workflow<'a> {
    model: &'a dyn ModelClient,
    changelog_path: PathBuf,
}

impl<'a> Workflow<'a> {
    pub fn new(model: &'a dyn ModelClient, changelog_path: PathBuf) -> Self {
        Self {
            model,
            changelog_path,
        }
    }

    /// Run the workflow over a unified diff.
    ///
    /// The quality loop spends at most [`MAX_ATTEMPTS`] improvement
    /// passes; once they are gone the current candidate is accepted as
    /// is, so a run that reaches the gate always terminates with a
    /// message.
    ///
    /// [`MAX_ATTEMPTS`]: crate::workflow::state::MAX_ATTEMPTS
    pub async fn run(&self, diff_text: &str) -> Result<WorkflowOutcome, WorkflowError> {
        let mut state = AgentState::new();

        let files = parse_diff(diff_text);
        if files.is_empty() {
            return Err(WorkflowError::NoStagedChanges);
        }
        info!("Parsed {} changed file(s)", files.len());
        state.log_event(WorkflowStep::ParseDiff.as_str(), format!("{} file(s)", files.len()));

        let files = analyze_files(self.model, diff_text, files).await?;
        state.log_event(WorkflowStep::AnalyzeFiles.as_str(), "per-file purposes assigned");

        let analysis = summarize_changes(self.model, files).await?;
        debug!(change_type = %analysis.change_type, "Diff summarized");
        state.analysis = Some(analysis.clone());
        state.log_event(
            WorkflowStep::Summarize.as_str(),
            format!("type={} breaking={}", analysis.change_type, analysis.breaking_change),
        );

        let commit = generate_message(self.model, &analysis).await?;
        let mut message = commit.render();
        state.log_event(WorkflowStep::GenerateMessage.as_str(), message.clone());

        loop {
            let verdict = judge_message(self.model, &message).await?;
            state.log_event(
                WorkflowStep::CheckQuality.as_str(),
                format!("is_valid={}", verdict.is_valid),
            );

            if verdict.is_valid {
                state.record(&message, Some(verdict), AttemptStatus::Final);
                break;
            }
            state.record(&message, Some(verdict), AttemptStatus::Failed);

            if state.budget_exhausted() {
                warn!(
                    "Quality gate still rejecting after {} improvement(s), accepting as is",
                    state.attempts
                );
                state.record(&message, None, AttemptStatus::Final);
                break;
            }
            state.attempts += 1;

            message = improve_message(self.model, &message, verdict).await?;
            debug!(attempt = state.attempts, "Improved candidate: {}", message);
            state.record(&message, None, AttemptStatus::Improved);
            state.log_event(WorkflowStep::ImproveMessage.as_str(), message.clone());
        }

        state.final_message = Some(message.clone());

        let section = format_section(&message, &analysis);
        append_section(&self.changelog_path, &section)?;
        state.log_event(
            WorkflowStep::EmitChangelog.as_str(),
            self.changelog_path.display().to_string(),
        );

        Ok(WorkflowOutcome {
            message,
            analysis,
            state,
        })
    }
}
