//! Workflow results and their wire envelope

use crate::error::{ErrorDetails, RouterError};
use crate::routing::envelope::EnvelopeStatus;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stage left out under the skip policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedStage {
    pub stage: String,
    pub reason: String,
}

/// Merged output of a completed workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub workflow_id: String,
    pub query: String,
    /// Stage outputs keyed by output key, in stage order
    pub outputs: Map<String, Value>,
    pub skipped_stages: Vec<SkippedStage>,
}

impl WorkflowResult {
    pub fn output(&self, key: &str) -> Option<&Value> {
        self.outputs.get(key)
    }

    pub fn products(&self) -> Option<&Value> {
        self.output("products")
    }

    pub fn market_analysis(&self) -> Option<&Value> {
        self.output("market_analysis")
    }

    pub fn sales_potential(&self) -> Option<&Value> {
        self.output("sales_potential")
    }

    pub fn evaluation(&self) -> Option<&Value> {
        self.output("evaluation")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "WorkflowEnvelope")]
pub enum WorkflowOutcome {
    Completed(WorkflowResult),
    Failed {
        details: ErrorDetails,
        workflow_id: Option<String>,
    },
}

impl WorkflowOutcome {
    pub fn from_error(error: &RouterError, workflow_id: Option<String>) -> Self {
        WorkflowOutcome::Failed {
            details: error.to_error_details(),
            workflow_id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, WorkflowOutcome::Completed(_))
    }

    pub fn status(&self) -> EnvelopeStatus {
        if self.is_success() {
            EnvelopeStatus::Success
        } else {
            EnvelopeStatus::Error
        }
    }

    pub fn result(&self) -> Option<&WorkflowResult> {
        match self {
            WorkflowOutcome::Completed(result) => Some(result),
            WorkflowOutcome::Failed { .. } => None,
        }
    }

    pub fn error_details(&self) -> Option<&ErrorDetails> {
        match self {
            WorkflowOutcome::Failed { details, .. } => Some(details),
            WorkflowOutcome::Completed(_) => None,
        }
    }

    pub fn workflow_id(&self) -> Option<&str> {
        match self {
            WorkflowOutcome::Completed(result) => Some(&result.workflow_id),
            WorkflowOutcome::Failed { workflow_id, .. } => workflow_id.as_deref(),
        }
    }

    pub fn to_envelope(&self) -> WorkflowEnvelope {
        self.clone().into()
    }
}

/// Flat wire form of a [`WorkflowOutcome`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowEnvelope {
    pub status: EnvelopeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_analysis: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_potential: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_stages: Vec<SkippedStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<WorkflowOutcome> for WorkflowEnvelope {
    fn from(outcome: WorkflowOutcome) -> Self {
        match outcome {
            WorkflowOutcome::Completed(mut result) => WorkflowEnvelope {
                status: EnvelopeStatus::Success,
                products: result.outputs.remove("products"),
                market_analysis: result.outputs.remove("market_analysis"),
                sales_potential: result.outputs.remove("sales_potential"),
                evaluation: result.outputs.remove("evaluation"),
                workflow_id: Some(result.workflow_id),
                query: Some(result.query),
                skipped_stages: result.skipped_stages,
                message: None,
                error: None,
            },
            WorkflowOutcome::Failed {
                details,
                workflow_id,
            } => WorkflowEnvelope {
                status: EnvelopeStatus::Error,
                workflow_id,
                query: None,
                products: None,
                market_analysis: None,
                sales_potential: None,
                evaluation: None,
                skipped_stages: Vec::new(),
                message: Some(details.message),
                error: Some(details.error),
            },
        }
    }
}
