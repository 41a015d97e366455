//! AgentZero - request router and workflow orchestrator
//!
//! Classifies natural-language requests, keeps a write-once context per
//! conversation, delegates to specialized task handlers, and chains those
//! handlers into a multi-stage research workflow.
//!
//! # Overview
//!
//! - [`routing::Orchestrator`] routes single requests and runs workflows
//! - [`agent::AgentRegistry`] maps agent types to [`agent::TaskHandler`]s
//! - [`routing::IntentClassifier`] detects plan requests and picks agents
//! - [`workflow::WorkflowEngine`] runs the fixed four-stage pipeline
//! - [`platform`] gates every operation on a platform readiness check
//!
//! # Quick Start
//!
//! ```rust
//! use agentzero::agent::specialized::register_simulated_agents;
//! use agentzero::config::OrchestratorConfig;
//! use agentzero::routing::Orchestrator;
//! use agentzero::testing::StaticReadiness;
//!
//! # tokio_test_block_on(async {
//! let config = OrchestratorConfig::new("agentzero-457213", "us-central1");
//! let orchestrator = Orchestrator::new(config, &StaticReadiness::ready());
//! register_simulated_agents(orchestrator.registry());
//!
//! let result = orchestrator.route("Find trending gadgets", Some("conv-1")).await;
//! assert_eq!(result.delegated_to(), Some("ProductResearchAgent"));
//! assert_eq!(result.context(), Some("trending gadgets"));
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod observability;
pub mod platform;
pub mod routing;
pub mod testing;
pub mod workflow;

pub use agent::{handler_fn, AgentKind, AgentRegistry, TaskHandler, TaskPayload};
pub use config::{ConfigError, MissingStagePolicy, OrchestratorConfig};
pub use error::{HandlerError, RouterError, RouterResult};
pub use routing::{Orchestrator, RouteResult};
pub use workflow::WorkflowOutcome;
