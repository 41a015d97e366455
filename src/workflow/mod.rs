//! Multi-stage workflow over the specialized agents
//!
//! A workflow runs the four research stages in a fixed order over one query
//! and merges each stage's distinctive output into a single document.

pub mod engine;
pub mod outcome;

pub use engine::{WorkflowEngine, WorkflowStage, WORKFLOW_STAGES};
pub use outcome::{SkippedStage, WorkflowEnvelope, WorkflowOutcome, WorkflowResult};
