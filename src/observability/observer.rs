//! Routing observer capability
//!
//! The orchestrator and workflow engine report what they do through an
//! explicitly supplied [`RoutingObserver`]. Every method has a no-op default,
//! so an observer only overrides the events it cares about.

use crate::agent::kind::AgentKind;
use crate::routing::classifier::Intent;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub trait RoutingObserver: Send + Sync {
    /// Call refused before classification (not ready or invalid input)
    fn request_rejected(&self, _request_id: Option<&str>, _reason: &str) {}

    fn request_classified(&self, _request_id: &str, _intent: Intent) {}

    fn plan_generated(&self, _request_id: &str) {}

    fn delegation_succeeded(&self, _request_id: &str, _agent_type: &str, _elapsed: Duration) {}

    /// Also reported for workflow stages, with the workflow id as request id
    fn handler_failed(&self, _request_id: &str, _agent_type: &str, _error: &str, _elapsed: Duration) {
    }

    fn no_agent_available(&self, _request_id: &str, _agent_type: &str) {}

    fn stage_completed(&self, _workflow_id: &str, _stage: AgentKind, _elapsed: Duration) {}

    fn stage_skipped(&self, _workflow_id: &str, _stage: AgentKind, _reason: &str) {}

    fn workflow_finished(&self, _workflow_id: &str, _success: bool, _elapsed: Duration) {}
}

/// Default observer: turns events into tracing records
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RoutingObserver for TracingObserver {
    fn request_rejected(&self, request_id: Option<&str>, reason: &str) {
        warn!(request_id = request_id.unwrap_or("-"), reason = %reason, "Request rejected");
    }

    fn request_classified(&self, request_id: &str, intent: Intent) {
        match intent {
            Intent::Plan => debug!(request_id = %request_id, "Classified as plan request"),
            Intent::Delegate(agent) => {
                debug!(request_id = %request_id, agent_type = %agent, "Classified request")
            }
        }
    }

    fn plan_generated(&self, request_id: &str) {
        info!(request_id = %request_id, "Generated plan");
    }

    fn delegation_succeeded(&self, request_id: &str, agent_type: &str, elapsed: Duration) {
        info!(
            request_id = %request_id,
            agent_type = %agent_type,
            duration_ms = elapsed.as_millis() as u64,
            "Delegation completed"
        );
    }

    fn handler_failed(&self, request_id: &str, agent_type: &str, error: &str, elapsed: Duration) {
        warn!(
            request_id = %request_id,
            agent_type = %agent_type,
            error = %error,
            duration_ms = elapsed.as_millis() as u64,
            "Agent failed to process task"
        );
    }

    fn no_agent_available(&self, request_id: &str, agent_type: &str) {
        warn!(request_id = %request_id, agent_type = %agent_type, "No agent available");
    }

    fn stage_completed(&self, workflow_id: &str, stage: AgentKind, elapsed: Duration) {
        info!(
            workflow_id = %workflow_id,
            stage = %stage,
            duration_ms = elapsed.as_millis() as u64,
            "Workflow stage completed"
        );
    }

    fn stage_skipped(&self, workflow_id: &str, stage: AgentKind, reason: &str) {
        warn!(workflow_id = %workflow_id, stage = %stage, reason = %reason, "Workflow stage skipped");
    }

    fn workflow_finished(&self, workflow_id: &str, success: bool, elapsed: Duration) {
        info!(
            workflow_id = %workflow_id,
            success,
            duration_ms = elapsed.as_millis() as u64,
            "Workflow finished"
        );
    }
}

/// Fans every event out to several observers, in order
#[derive(Clone, Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn RoutingObserver>>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: Arc<dyn RoutingObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl std::fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl RoutingObserver for CompositeObserver {
    fn request_rejected(&self, request_id: Option<&str>, reason: &str) {
        for observer in &self.observers {
            observer.request_rejected(request_id, reason);
        }
    }

    fn request_classified(&self, request_id: &str, intent: Intent) {
        for observer in &self.observers {
            observer.request_classified(request_id, intent);
        }
    }

    fn plan_generated(&self, request_id: &str) {
        for observer in &self.observers {
            observer.plan_generated(request_id);
        }
    }

    fn delegation_succeeded(&self, request_id: &str, agent_type: &str, elapsed: Duration) {
        for observer in &self.observers {
            observer.delegation_succeeded(request_id, agent_type, elapsed);
        }
    }

    fn handler_failed(&self, request_id: &str, agent_type: &str, error: &str, elapsed: Duration) {
        for observer in &self.observers {
            observer.handler_failed(request_id, agent_type, error, elapsed);
        }
    }

    fn no_agent_available(&self, request_id: &str, agent_type: &str) {
        for observer in &self.observers {
            observer.no_agent_available(request_id, agent_type);
        }
    }

    fn stage_completed(&self, workflow_id: &str, stage: AgentKind, elapsed: Duration) {
        for observer in &self.observers {
            observer.stage_completed(workflow_id, stage, elapsed);
        }
    }

    fn stage_skipped(&self, workflow_id: &str, stage: AgentKind, reason: &str) {
        for observer in &self.observers {
            observer.stage_skipped(workflow_id, stage, reason);
        }
    }

    fn workflow_finished(&self, workflow_id: &str, success: bool, elapsed: Duration) {
        for observer in &self.observers {
            observer.workflow_finished(workflow_id, success, elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct PlanCounter(AtomicUsize);

    impl RoutingObserver for PlanCounter {
        fn plan_generated(&self, _request_id: &str) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_composite_fans_out() {
        let first = Arc::new(PlanCounter::default());
        let second = Arc::new(PlanCounter::default());
        let composite = CompositeObserver::new()
            .with(first.clone())
            .with(second.clone())
            .with(Arc::new(TracingObserver));

        composite.plan_generated("req-1");
        composite.no_agent_available("req-2", "MarketAnalysisAgent");

        assert_eq!(composite.len(), 3);
        assert_eq!(first.0.load(Ordering::SeqCst), 1);
        assert_eq!(second.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_default_methods_are_no_ops() {
        let counter = PlanCounter::default();
        counter.request_rejected(None, "not ready");
        counter.stage_skipped("wf-1", AgentKind::MarketAnalysis, "not registered");
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);
    }
}
