//! Agent registry
//!
//! Thread-safe mapping from agent-type identifier to handler. Registration is
//! last-write-wins and there is no deregistration. Delegation clones the
//! handler out of the map before invoking it, so no lock is held while a
//! handler runs.

use crate::agent::handler::{TaskHandler, TaskPayload};
use crate::error::{RouterError, RouterResult};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

/// Thread-safe registry of specialized agents
#[derive(Clone, Default)]
pub struct AgentRegistry {
    /// Map of agent_type to handler
    handlers: Arc<RwLock<HashMap<String, Arc<dyn TaskHandler>>>>,
}

impl fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("agent_types", &self.registered_types())
            .finish()
    }
}

impl AgentRegistry {
    /// Create a new empty agent registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the handler for an agent type
    pub fn register<S: Into<String>>(&self, agent_type: S, handler: Arc<dyn TaskHandler>) {
        let agent_type = agent_type.into();
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        let replaced = handlers.insert(agent_type.clone(), handler).is_some();

        if replaced {
            debug!("Replaced handler for agent: {}", agent_type);
        } else {
            info!("Registered specialized agent: {}", agent_type);
        }
    }

    /// Get the handler registered for an agent type
    pub fn get_handler(&self, agent_type: &str) -> Option<Arc<dyn TaskHandler>> {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        handlers.get(agent_type).cloned()
    }

    pub fn contains(&self, agent_type: &str) -> bool {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        handlers.contains_key(agent_type)
    }

    pub fn agent_count(&self) -> usize {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        handlers.len()
    }

    /// Registered agent types, sorted
    pub fn registered_types(&self) -> Vec<String> {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        let mut types: Vec<String> = handlers.keys().cloned().collect();
        types.sort();
        types
    }

    /// Invoke the handler for `agent_type` and return its result verbatim
    ///
    /// # Errors
    ///
    /// `DelegationTargetNotFound` when nothing is registered under
    /// `agent_type`; `HandlerFailure` when the handler itself fails.
    pub async fn delegate(&self, agent_type: &str, task: &TaskPayload) -> RouterResult<Value> {
        let handler = self
            .get_handler(agent_type)
            .ok_or_else(|| RouterError::delegation_target_not_found(agent_type))?;

        debug!(agent_type = %agent_type, query = %task.query, "Delegating task");

        handler
            .process_task(task)
            .await
            .map_err(|e| RouterError::handler_failure(agent_type, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::handler::handler_fn;
    use crate::error::HandlerError;
    use serde_json::json;

    #[test]
    fn test_registration() {
        let registry = AgentRegistry::new();
        assert_eq!(registry.agent_count(), 0);

        registry.register("ProductResearchAgent", handler_fn(|_| Ok(json!({}))));

        assert_eq!(registry.agent_count(), 1);
        assert!(registry.contains("ProductResearchAgent"));
        assert!(!registry.contains("MarketAnalysisAgent"));
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let registry = AgentRegistry::new();
        registry.register("EchoAgent", handler_fn(|_| Ok(json!({"version": 1}))));
        registry.register("EchoAgent", handler_fn(|_| Ok(json!({"version": 2}))));

        assert_eq!(registry.agent_count(), 1);
        let result = registry
            .delegate("EchoAgent", &TaskPayload::default())
            .await
            .unwrap();
        assert_eq!(result["version"], 2);
    }

    #[tokio::test]
    async fn test_delegate_returns_result_verbatim() {
        let registry = AgentRegistry::new();
        registry.register(
            "EchoAgent",
            handler_fn(|task| Ok(json!({"query": task.query, "context": task.context}))),
        );

        let result = registry
            .delegate("EchoAgent", &TaskPayload::new("hello", "ctx"))
            .await
            .unwrap();

        assert_eq!(result, json!({"query": "hello", "context": "ctx"}));
    }

    #[tokio::test]
    async fn test_delegate_unregistered_type() {
        let registry = AgentRegistry::new();

        let err = registry
            .delegate("MissingAgent", &TaskPayload::default())
            .await
            .unwrap_err();

        match err {
            RouterError::DelegationTargetNotFound { agent_type } => {
                assert_eq!(agent_type, "MissingAgent")
            }
            other => panic!("Expected DelegationTargetNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delegate_propagates_handler_error() {
        let registry = AgentRegistry::new();
        registry.register(
            "FlakyAgent",
            handler_fn(|_| Err(HandlerError::processing_failed("upstream timeout"))),
        );

        let err = registry
            .delegate("FlakyAgent", &TaskPayload::default())
            .await
            .unwrap_err();

        assert!(matches!(err, RouterError::HandlerFailure { .. }));
        assert!(err.to_string().contains("upstream timeout"));
    }

    #[test]
    fn test_registered_types_sorted() {
        let registry = AgentRegistry::new();
        registry.register("b-agent", handler_fn(|_| Ok(json!({}))));
        registry.register("a-agent", handler_fn(|_| Ok(json!({}))));

        assert_eq!(registry.registered_types(), vec!["a-agent", "b-agent"]);
    }

    #[test]
    fn test_clones_share_state() {
        let registry = AgentRegistry::new();
        let clone = registry.clone();

        clone.register("SharedAgent", handler_fn(|_| Ok(json!({}))));

        assert!(registry.contains("SharedAgent"));
    }
}
