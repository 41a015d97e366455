//! Simulated specialized agents
//!
//! Stand-ins for the real research, market, sales and evaluation services.
//! They answer from fixed tables keyed on the product segment mentioned in
//! the query or context.

pub mod market_analysis;
pub mod product_evaluation;
pub mod product_research;
pub mod sales_opportunity;

pub use market_analysis::MarketAnalysisAgent;
pub use product_evaluation::ProductEvaluationAgent;
pub use product_research::ProductResearchAgent;
pub use sales_opportunity::SalesOpportunityAgent;

use crate::agent::handler::TaskHandler;
use crate::agent::kind::AgentKind;
use crate::agent::registry::AgentRegistry;
use std::sync::Arc;

/// Product segment a task is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment {
    Headphones,
    Watches,
    Generic,
}

impl Segment {
    pub(crate) fn detect(search_text: &str) -> Self {
        if search_text.contains("headphone") {
            Segment::Headphones
        } else if search_text.contains("watch") {
            Segment::Watches
        } else {
            Segment::Generic
        }
    }
}

/// Register all four simulated agents under their standard agent types
pub fn register_simulated_agents(registry: &AgentRegistry) {
    let agents: [(AgentKind, Arc<dyn TaskHandler>); 4] = [
        (
            AgentKind::ProductResearch,
            Arc::new(ProductResearchAgent::new()),
        ),
        (
            AgentKind::MarketAnalysis,
            Arc::new(MarketAnalysisAgent::new()),
        ),
        (
            AgentKind::SalesOpportunity,
            Arc::new(SalesOpportunityAgent::new()),
        ),
        (
            AgentKind::ProductEvaluation,
            Arc::new(ProductEvaluationAgent::new()),
        ),
    ];

    for (kind, handler) in agents {
        registry.register(kind.as_str(), handler);
    }
}
