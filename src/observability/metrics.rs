//! Thread-safe routing metrics
//!
//! Atomic counters for high-frequency events and mutex-protected collections
//! for per-agent statistics and delegation timings. A [`RoutingMetrics`] is an
//! ordinary value: create one, hand it to the orchestrator as an observer, and
//! read it back with [`RoutingMetrics::snapshot`].

use crate::agent::kind::AgentKind;
use crate::observability::observer::RoutingObserver;
use crate::routing::classifier::Intent;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Timing samples kept per collector and per agent
const MAX_TIMING_SAMPLES: usize = 1000;

#[derive(Debug, Default)]
pub struct RoutingMetrics {
    requests_rejected: AtomicU64,
    requests_classified: AtomicU64,
    plans_generated: AtomicU64,
    delegations_succeeded: AtomicU64,
    handler_failures: AtomicU64,
    no_agent_available: AtomicU64,
    workflows_completed: AtomicU64,
    workflows_failed: AtomicU64,
    stages_completed: AtomicU64,
    stages_skipped: AtomicU64,

    // milliseconds, successful and failed delegations alike
    delegation_times: Mutex<Vec<u64>>,
    agent_stats: Mutex<HashMap<String, AgentStats>>,
}

#[derive(Debug, Default)]
struct AgentStats {
    delegations: u64,
    failures: u64,
    unavailable: u64,
    times: Vec<u64>,
    last_delegation: u64,
}

impl AgentStats {
    fn record(&mut self, elapsed: Duration, success: bool) {
        self.delegations += 1;
        if !success {
            self.failures += 1;
        }
        self.last_delegation = current_timestamp();
        push_capped(&mut self.times, elapsed);
    }

    fn snapshot(&self) -> AgentStatsSnapshot {
        let avg_time_ms = if self.times.is_empty() {
            0.0
        } else {
            self.times.iter().sum::<u64>() as f64 / self.times.len() as f64
        };
        let success_rate = if self.delegations == 0 {
            0.0
        } else {
            (self.delegations - self.failures) as f64 / self.delegations as f64
        };

        AgentStatsSnapshot {
            delegations: self.delegations,
            failures: self.failures,
            unavailable: self.unavailable,
            avg_time_ms,
            success_rate,
            last_delegation: self.last_delegation,
        }
    }
}

impl RoutingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn record_delegation(&self, agent_type: &str, elapsed: Duration, success: bool) {
        {
            let mut times = self
                .delegation_times
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            push_capped(&mut times, elapsed);
        }
        let mut stats = self
            .agent_stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        stats
            .entry(agent_type.to_string())
            .or_default()
            .record(elapsed, success);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let mut times = self
            .delegation_times
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        times.sort_unstable();

        let avg_delegation_time_ms = if times.is_empty() {
            0.0
        } else {
            times.iter().sum::<u64>() as f64 / times.len() as f64
        };

        let agents = self
            .agent_stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(agent_type, stats)| (agent_type.clone(), stats.snapshot()))
            .collect();

        MetricsSnapshot {
            timestamp: current_timestamp(),
            routing: RoutingCounters {
                requests_rejected: self.requests_rejected.load(Ordering::Relaxed),
                requests_classified: self.requests_classified.load(Ordering::Relaxed),
                plans_generated: self.plans_generated.load(Ordering::Relaxed),
                delegations_succeeded: self.delegations_succeeded.load(Ordering::Relaxed),
                handler_failures: self.handler_failures.load(Ordering::Relaxed),
                no_agent_available: self.no_agent_available.load(Ordering::Relaxed),
                avg_delegation_time_ms,
                p50_delegation_time_ms: percentile(&times, 50.0),
                p95_delegation_time_ms: percentile(&times, 95.0),
                p99_delegation_time_ms: percentile(&times, 99.0),
            },
            workflows: WorkflowCounters {
                completed: self.workflows_completed.load(Ordering::Relaxed),
                failed: self.workflows_failed.load(Ordering::Relaxed),
                stages_completed: self.stages_completed.load(Ordering::Relaxed),
                stages_skipped: self.stages_skipped.load(Ordering::Relaxed),
            },
            agents,
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.requests_rejected,
            &self.requests_classified,
            &self.plans_generated,
            &self.delegations_succeeded,
            &self.handler_failures,
            &self.no_agent_available,
            &self.workflows_completed,
            &self.workflows_failed,
            &self.stages_completed,
            &self.stages_skipped,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
        self.delegation_times
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.agent_stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl RoutingObserver for RoutingMetrics {
    fn request_rejected(&self, _request_id: Option<&str>, _reason: &str) {
        self.requests_rejected.fetch_add(1, Ordering::Relaxed);
    }

    fn request_classified(&self, _request_id: &str, _intent: Intent) {
        self.requests_classified.fetch_add(1, Ordering::Relaxed);
    }

    fn plan_generated(&self, _request_id: &str) {
        self.plans_generated.fetch_add(1, Ordering::Relaxed);
    }

    fn delegation_succeeded(&self, _request_id: &str, agent_type: &str, elapsed: Duration) {
        self.delegations_succeeded.fetch_add(1, Ordering::Relaxed);
        self.record_delegation(agent_type, elapsed, true);
    }

    fn handler_failed(&self, _request_id: &str, agent_type: &str, _error: &str, elapsed: Duration) {
        self.handler_failures.fetch_add(1, Ordering::Relaxed);
        self.record_delegation(agent_type, elapsed, false);
    }

    fn no_agent_available(&self, _request_id: &str, agent_type: &str) {
        self.no_agent_available.fetch_add(1, Ordering::Relaxed);
        let mut stats = self
            .agent_stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        stats.entry(agent_type.to_string()).or_default().unavailable += 1;
    }

    fn stage_completed(&self, _workflow_id: &str, _stage: AgentKind, _elapsed: Duration) {
        self.stages_completed.fetch_add(1, Ordering::Relaxed);
    }

    fn stage_skipped(&self, _workflow_id: &str, _stage: AgentKind, _reason: &str) {
        self.stages_skipped.fetch_add(1, Ordering::Relaxed);
    }

    fn workflow_finished(&self, _workflow_id: &str, success: bool, _elapsed: Duration) {
        if success {
            self.workflows_completed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.workflows_failed.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: u64,
    pub routing: RoutingCounters,
    pub workflows: WorkflowCounters,
    pub agents: HashMap<String, AgentStatsSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoutingCounters {
    pub requests_rejected: u64,
    pub requests_classified: u64,
    pub plans_generated: u64,
    pub delegations_succeeded: u64,
    pub handler_failures: u64,
    pub no_agent_available: u64,
    pub avg_delegation_time_ms: f64,
    pub p50_delegation_time_ms: f64,
    pub p95_delegation_time_ms: f64,
    pub p99_delegation_time_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowCounters {
    pub completed: u64,
    pub failed: u64,
    pub stages_completed: u64,
    pub stages_skipped: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentStatsSnapshot {
    pub delegations: u64,
    pub failures: u64,
    pub unavailable: u64,
    pub avg_time_ms: f64,
    pub success_rate: f64,
    pub last_delegation: u64,
}

fn push_capped(samples: &mut Vec<u64>, elapsed: Duration) {
    samples.push(elapsed.as_millis() as u64);
    if samples.len() > MAX_TIMING_SAMPLES {
        samples.remove(0);
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn percentile(sorted_data: &[u64], percentile: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }

    let index = (percentile / 100.0) * (sorted_data.len() - 1) as f64;
    let lower = sorted_data[index.floor() as usize] as f64;
    let upper = sorted_data[index.ceil() as usize] as f64;

    lower + (upper - lower) * index.fract()
}
