//! Mock implementations for testing
//!
//! Provides a scriptable task handler, a fixed platform readiness check and
//! an observer that records every routing event.

use crate::agent::handler::{TaskHandler, TaskPayload};
use crate::agent::kind::AgentKind;
use crate::config::PlatformSection;
use crate::error::HandlerError;
use crate::observability::observer::RoutingObserver;
use crate::platform::{PlatformError, PlatformIdentity, PlatformReadiness};
use crate::routing::classifier::Intent;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, PoisonError};
use std::time::Duration;
use tokio::sync::Mutex;

/// Mock task handler
///
/// Records every payload it receives. Without a scripted response it echoes
/// the query and context back.
#[derive(Debug, Clone, Default)]
pub struct MockHandler {
    pub received: Arc<Mutex<Vec<TaskPayload>>>,
    pub response: Option<Value>,
    pub failure: Option<String>,
    pub delay: Option<Duration>,
}

impl MockHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(response: Value) -> Self {
        Self {
            response: Some(response),
            ..Default::default()
        }
    }

    pub fn with_failure(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Default::default()
        }
    }

    /// Sleep before answering
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub async fn received_tasks(&self) -> Vec<TaskPayload> {
        self.received.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.received.lock().await.len()
    }
}

#[async_trait]
impl TaskHandler for MockHandler {
    async fn process_task(&self, task: &TaskPayload) -> Result<Value, HandlerError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.received.lock().await.push(task.clone());

        if let Some(message) = &self.failure {
            return Err(HandlerError::processing_failed(message.clone()));
        }

        Ok(self.response.clone().unwrap_or_else(|| {
            json!({
                "result": "success",
                "query": task.query,
                "context": task.context,
                "source": "Mock Agent",
            })
        }))
    }
}

/// Platform readiness with a fixed answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticReadiness {
    Ready,
    CredentialsFailure(String),
    InitializationFailure(String),
}

impl StaticReadiness {
    pub fn ready() -> Self {
        StaticReadiness::Ready
    }

    pub fn credentials_failure(message: impl Into<String>) -> Self {
        StaticReadiness::CredentialsFailure(message.into())
    }

    pub fn initialization_failure(message: impl Into<String>) -> Self {
        StaticReadiness::InitializationFailure(message.into())
    }
}

impl PlatformReadiness for StaticReadiness {
    fn check(&self, platform: &PlatformSection) -> Result<PlatformIdentity, PlatformError> {
        match self {
            StaticReadiness::Ready => Ok(PlatformIdentity {
                project_id: platform.project_id.clone(),
                location: platform.location.clone(),
                credential_source: "static test credentials".to_string(),
            }),
            StaticReadiness::CredentialsFailure(message) => {
                Err(PlatformError::Credentials(message.clone()))
            }
            StaticReadiness::InitializationFailure(message) => {
                Err(PlatformError::Initialization(message.clone()))
            }
        }
    }
}

/// One event seen by a [`RecordingObserver`]
#[derive(Debug, Clone, PartialEq)]
pub enum ObservedEvent {
    Rejected {
        request_id: Option<String>,
        reason: String,
    },
    Classified {
        request_id: String,
        intent: Intent,
    },
    PlanGenerated {
        request_id: String,
    },
    Delegated {
        request_id: String,
        agent_type: String,
    },
    HandlerFailed {
        request_id: String,
        agent_type: String,
        error: String,
    },
    NoAgentAvailable {
        request_id: String,
        agent_type: String,
    },
    StageCompleted {
        workflow_id: String,
        stage: AgentKind,
    },
    StageSkipped {
        workflow_id: String,
        stage: AgentKind,
        reason: String,
    },
    WorkflowFinished {
        workflow_id: String,
        success: bool,
    },
}

#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: std::sync::Mutex<Vec<ObservedEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count<F: Fn(&ObservedEvent) -> bool>(&self, predicate: F) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|event| predicate(event))
            .count()
    }

    fn push(&self, event: ObservedEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl RoutingObserver for RecordingObserver {
    fn request_rejected(&self, request_id: Option<&str>, reason: &str) {
        self.push(ObservedEvent::Rejected {
            request_id: request_id.map(str::to_string),
            reason: reason.to_string(),
        });
    }

    fn request_classified(&self, request_id: &str, intent: Intent) {
        self.push(ObservedEvent::Classified {
            request_id: request_id.to_string(),
            intent,
        });
    }

    fn plan_generated(&self, request_id: &str) {
        self.push(ObservedEvent::PlanGenerated {
            request_id: request_id.to_string(),
        });
    }

    fn delegation_succeeded(&self, request_id: &str, agent_type: &str, _elapsed: Duration) {
        self.push(ObservedEvent::Delegated {
            request_id: request_id.to_string(),
            agent_type: agent_type.to_string(),
        });
    }

    fn handler_failed(&self, request_id: &str, agent_type: &str, error: &str, _elapsed: Duration) {
        self.push(ObservedEvent::HandlerFailed {
            request_id: request_id.to_string(),
            agent_type: agent_type.to_string(),
            error: error.to_string(),
        });
    }

    fn no_agent_available(&self, request_id: &str, agent_type: &str) {
        self.push(ObservedEvent::NoAgentAvailable {
            request_id: request_id.to_string(),
            agent_type: agent_type.to_string(),
        });
    }

    fn stage_completed(&self, workflow_id: &str, stage: AgentKind, _elapsed: Duration) {
        self.push(ObservedEvent::StageCompleted {
            workflow_id: workflow_id.to_string(),
            stage,
        });
    }

    fn stage_skipped(&self, workflow_id: &str, stage: AgentKind, reason: &str) {
        self.push(ObservedEvent::StageSkipped {
            workflow_id: workflow_id.to_string(),
            stage,
            reason: reason.to_string(),
        });
    }

    fn workflow_finished(&self, workflow_id: &str, success: bool, _elapsed: Duration) {
        self.push(ObservedEvent::WorkflowFinished {
            workflow_id: workflow_id.to_string(),
            success,
        });
    }
}
