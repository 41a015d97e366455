//! Orchestrator: the request router
//!
//! Composes the readiness gate, intent classifier, context store and agent
//! registry. One call to [`Orchestrator::route`] walks:
//!
//! ```text
//! readiness gate → input check → request id → conversation lock
//!     → plan detection → classification → context (write-once) → dispatch
//! ```
//!
//! and always returns exactly one [`RouteResult`].
//!
//! # Example
//!
//! ```rust,no_run
//! use agentzero::agent::specialized::register_simulated_agents;
//! use agentzero::config::OrchestratorConfig;
//! use agentzero::platform::EnvCredentialsCheck;
//! use agentzero::routing::Orchestrator;
//!
//! # async fn example() {
//! let config = OrchestratorConfig::new("agentzero-457213", "us-central1");
//! let orchestrator = Orchestrator::new(config, &EnvCredentialsCheck::new());
//! register_simulated_agents(orchestrator.registry());
//!
//! let result = orchestrator.route("Find trending gadgets", None).await;
//! println!("{}", serde_json::to_string_pretty(&result).unwrap());
//! # }
//! ```

use crate::agent::handler::{TaskHandler, TaskPayload};
use crate::agent::kind::AgentKind;
use crate::agent::registry::AgentRegistry;
use crate::config::OrchestratorConfig;
use crate::error::{sanitize_error_message, RouterError, RouterResult};
use crate::observability::observer::{RoutingObserver, TracingObserver};
use crate::platform::{PlatformReadiness, ReadinessGate};
use crate::routing::classifier::{Intent, IntentClassifier, PLAN_TEXT};
use crate::routing::context::{ContextOrigin, ContextStore, ConversationContext, ConversationLocks};
use crate::routing::envelope::{DelegationOutcome, RouteResult};
use crate::workflow::{WorkflowEngine, WorkflowOutcome};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, Instrument};
use uuid::Uuid;

pub struct Orchestrator {
    config: OrchestratorConfig,
    gate: ReadinessGate,
    classifier: IntentClassifier,
    registry: AgentRegistry,
    contexts: ContextStore,
    locks: ConversationLocks,
    observer: Arc<dyn RoutingObserver>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("project_id", &self.config.platform.project_id)
            .field("ready", &self.gate.is_ready())
            .field("registry", &self.registry)
            .field("contexts", &self.contexts.len())
            .finish()
    }
}

impl Orchestrator {
    /// Build an orchestrator, running the platform readiness check once
    ///
    /// Construction never fails. A failed check leaves the orchestrator
    /// not ready with a diagnostic in [`Orchestrator::status_message`].
    pub fn new(config: OrchestratorConfig, readiness: &dyn PlatformReadiness) -> Self {
        let gate = ReadinessGate::evaluate(readiness, &config.platform);

        info!(
            project_id = %config.platform.project_id,
            location = %config.platform.location,
            ready = gate.is_ready(),
            "Orchestrator created"
        );

        Self {
            config,
            gate,
            classifier: IntentClassifier::new(),
            registry: AgentRegistry::new(),
            contexts: ContextStore::new(),
            locks: ConversationLocks::new(),
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn RoutingObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn is_ready(&self) -> bool {
        self.gate.is_ready()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.gate.status_message()
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Register or replace the handler for an agent type
    pub fn register<S: Into<String>>(&self, agent_type: S, handler: Arc<dyn TaskHandler>) {
        self.registry.register(agent_type, handler);
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn registered_agents(&self) -> Vec<String> {
        self.registry.registered_types()
    }

    /// Conversations with a routing call in progress or waiting
    pub fn active_turns(&self) -> usize {
        self.locks.len()
    }

    pub fn has_conversation_context(&self, conversation_id: &str) -> bool {
        self.contexts.contains(conversation_id)
    }

    pub fn conversation_context(&self, conversation_id: &str) -> Option<ConversationContext> {
        self.contexts.get(conversation_id)
    }

    /// Delegate a payload straight to a registered agent
    ///
    /// Unlike [`Orchestrator::route`], handler failures come back as
    /// `HandlerFailure` errors rather than a soft envelope field.
    pub async fn delegate_task(&self, agent_type: &str, task: &TaskPayload) -> RouterResult<Value> {
        self.gate.ensure_ready()?;
        self.registry.delegate(agent_type, task).await
    }

    /// Route one request and build its envelope
    pub async fn route(&self, request: &str, request_id: Option<&str>) -> RouteResult {
        if let Err(error) = self.gate.ensure_ready() {
            self.observer
                .request_rejected(request_id, &error.to_string());
            return RouteResult::from_error(&error, request_id.map(str::to_string));
        }

        let request_id = request_id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        if request.trim().is_empty() {
            let error = RouterError::invalid_input("request text must not be empty");
            self.observer
                .request_rejected(Some(&request_id), &error.to_string());
            return RouteResult::from_error(&error, Some(request_id));
        }

        let span = crate::route_span!(request_id = %request_id);
        self.route_ready(request, request_id).instrument(span).await
    }

    async fn route_ready(&self, request: &str, request_id: String) -> RouteResult {
        // Turns of one conversation never interleave
        let _turn = self.locks.acquire(&request_id).await;

        let intent = self.classifier.classify(request);
        self.observer.request_classified(&request_id, intent);

        match intent {
            Intent::Plan => {
                let (context, created) =
                    self.contexts
                        .get_or_insert_with(request_id.as_str(), ContextOrigin::PlanRequest, || {
                            request.to_string()
                        });
                debug!(created, context = %context.text, "Plan request context");
                self.observer.plan_generated(&request_id);

                RouteResult::PlanGenerated {
                    plan: PLAN_TEXT.to_string(),
                    request_id,
                }
            }
            Intent::Delegate(agent) => self.dispatch(request, request_id, agent).await,
        }
    }

    async fn dispatch(&self, request: &str, request_id: String, agent: AgentKind) -> RouteResult {
        let (context, _) =
            self.contexts
                .get_or_insert_with(request_id.as_str(), ContextOrigin::Derived, || {
                    self.classifier.derive_context(request)
                });

        let agent_type = agent.as_str();
        let task = TaskPayload::new(request, context.text.clone());
        let started = Instant::now();

        let outcome = match self.registry.delegate(agent_type, &task).await {
            Ok(response) => {
                self.observer
                    .delegation_succeeded(&request_id, agent_type, started.elapsed());
                DelegationOutcome::Response(response)
            }
            Err(RouterError::HandlerFailure { source, .. }) => {
                let message = sanitize_error_message(&source.to_string());
                self.observer
                    .handler_failed(&request_id, agent_type, &message, started.elapsed());
                DelegationOutcome::Failed(message)
            }
            Err(error) => {
                self.observer.no_agent_available(&request_id, agent_type);
                return RouteResult::from_error(&error, Some(request_id));
            }
        };

        RouteResult::Delegated {
            agent_type: agent_type.to_string(),
            request_id,
            context: context.text,
            outcome,
        }
    }

    /// Run the fixed research workflow over `query`
    pub async fn execute_workflow(&self, query: &str) -> WorkflowOutcome {
        if let Err(error) = self.gate.ensure_ready() {
            self.observer.request_rejected(None, &error.to_string());
            return WorkflowOutcome::from_error(&error, None);
        }

        self.workflow_engine().run(query).await
    }

    /// Workflow engine sharing this orchestrator's registry and observer
    pub fn workflow_engine(&self) -> WorkflowEngine {
        WorkflowEngine::new(self.registry.clone(), self.config.workflow.missing_stage)
            .with_observer(Arc::clone(&self.observer))
    }
}
