//! Workflow orchestration: session state and the step engine.

pub mod engine;
pub mod state;

pub use engine::{Workflow, WorkflowOutcome, WorkflowStep};
pub use state::{AgentState, AttemptRecord, AttemptStatus, MAX_ATTEMPTS, WorkflowEvent};
