//! Observability: structured logging setup, the routing observer capability,
//! and routing metrics.
//!
//! The orchestrator never reaches for process-wide state; it reports through
//! the [`RoutingObserver`] it was constructed with.

pub mod logging;
pub mod metrics;
pub mod observer;

pub use logging::{init_default_logging, init_logging, LogFormat};
pub use metrics::{AgentStatsSnapshot, MetricsSnapshot, RoutingMetrics};
pub use observer::{CompositeObserver, RoutingObserver, TracingObserver};

// Span macros for structured logging
pub use logging::{route_span, workflow_span};
