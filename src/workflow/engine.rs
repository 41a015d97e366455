//! Fixed four-stage workflow engine
//!
//! Stages run sequentially. Each stage's task carries the query, the derived
//! keyword context of the query, and every earlier stage's output under its
//! output key, so later stages can build on earlier research.

use crate::agent::handler::TaskPayload;
use crate::agent::kind::AgentKind;
use crate::agent::registry::AgentRegistry;
use crate::config::MissingStagePolicy;
use crate::error::{sanitize_error_message, RouterError};
use crate::observability::observer::{RoutingObserver, TracingObserver};
use crate::routing::classifier::IntentClassifier;
use crate::workflow::outcome::{SkippedStage, WorkflowOutcome, WorkflowResult};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, Instrument};
use uuid::Uuid;

/// One pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowStage {
    pub agent: AgentKind,
    /// Key of this stage's output in the merged document
    pub output_key: &'static str,
    /// Field lifted out of the handler's result
    pub result_field: &'static str,
}

impl WorkflowStage {
    /// Lift the distinctive field out of a handler result, or keep the whole
    /// result when the field is missing
    pub fn extract(&self, mut result: Value) -> Value {
        if let Some(value) = result.get_mut(self.result_field) {
            return value.take();
        }
        result
    }
}

pub const WORKFLOW_STAGES: [WorkflowStage; 4] = [
    WorkflowStage {
        agent: AgentKind::ProductResearch,
        output_key: "products",
        result_field: "products",
    },
    WorkflowStage {
        agent: AgentKind::MarketAnalysis,
        output_key: "market_analysis",
        result_field: "market_data",
    },
    WorkflowStage {
        agent: AgentKind::SalesOpportunity,
        output_key: "sales_potential",
        result_field: "sales_potential",
    },
    WorkflowStage {
        agent: AgentKind::ProductEvaluation,
        output_key: "evaluation",
        result_field: "evaluation",
    },
];

/// Runs [`WORKFLOW_STAGES`] against a shared registry
///
/// Readiness is checked by the caller; the engine assumes it may run.
#[derive(Clone)]
pub struct WorkflowEngine {
    registry: AgentRegistry,
    classifier: IntentClassifier,
    policy: MissingStagePolicy,
    observer: Arc<dyn RoutingObserver>,
}

impl std::fmt::Debug for WorkflowEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowEngine")
            .field("registry", &self.registry)
            .field("policy", &self.policy)
            .finish()
    }
}

impl WorkflowEngine {
    pub fn new(registry: AgentRegistry, policy: MissingStagePolicy) -> Self {
        Self {
            registry,
            classifier: IntentClassifier::new(),
            policy,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn RoutingObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn policy(&self) -> MissingStagePolicy {
        self.policy
    }

    pub fn stages(&self) -> &'static [WorkflowStage] {
        &WORKFLOW_STAGES
    }

    /// Run every stage over `query` and merge the outputs
    pub async fn run(&self, query: &str) -> WorkflowOutcome {
        if query.trim().is_empty() {
            let error = RouterError::invalid_input("workflow query must not be empty");
            self.observer.request_rejected(None, &error.to_string());
            return WorkflowOutcome::from_error(&error, None);
        }

        let workflow_id = Uuid::new_v4().to_string();
        let span = crate::workflow_span!(workflow_id = %workflow_id);

        self.run_stages(query, workflow_id).instrument(span).await
    }

    async fn run_stages(&self, query: &str, workflow_id: String) -> WorkflowOutcome {
        let started = Instant::now();
        let context = self.classifier.derive_context(query);
        let mut outputs = Map::new();
        let mut skipped_stages = Vec::new();

        info!(query = %query, stages = WORKFLOW_STAGES.len(), "Starting workflow");

        for stage in self.stages() {
            let task = outputs.iter().fold(
                TaskPayload::new(query, context.clone()),
                |task, (key, value): (&String, &Value)| task.with_field(key.clone(), value.clone()),
            );

            let stage_started = Instant::now();
            match self.registry.delegate(stage.agent.as_str(), &task).await {
                Ok(result) => {
                    debug!(stage = %stage.agent, output_key = stage.output_key, "Stage produced output");
                    outputs.insert(stage.output_key.to_string(), stage.extract(result));
                    self.observer
                        .stage_completed(&workflow_id, stage.agent, stage_started.elapsed());
                }
                Err(error) => {
                    let reason = sanitize_error_message(&error.to_string());
                    match &error {
                        RouterError::HandlerFailure { .. } => self.observer.handler_failed(
                            &workflow_id,
                            stage.agent.as_str(),
                            &reason,
                            stage_started.elapsed(),
                        ),
                        _ => self
                            .observer
                            .no_agent_available(&workflow_id, stage.agent.as_str()),
                    }
                    match self.policy {
                        MissingStagePolicy::Fail => {
                            self.observer
                                .workflow_finished(&workflow_id, false, started.elapsed());
                            let error =
                                RouterError::workflow_stage_failed(stage.agent.as_str(), reason);
                            return WorkflowOutcome::from_error(&error, Some(workflow_id));
                        }
                        MissingStagePolicy::Skip => {
                            self.observer.stage_skipped(&workflow_id, stage.agent, &reason);
                            skipped_stages.push(SkippedStage {
                                stage: stage.agent.as_str().to_string(),
                                reason,
                            });
                        }
                    }
                }
            }
        }

        self.observer
            .workflow_finished(&workflow_id, true, started.elapsed());

        WorkflowOutcome::Completed(WorkflowResult {
            workflow_id,
            query: query.to_string(),
            outputs,
            skipped_stages,
        })
    }
}
