//! Built-in agent types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The specialized agent types the classifier and workflow know about
///
/// The registry itself is keyed by plain strings, so callers may register
/// handlers under other names; these are the ones routing can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    #[serde(rename = "ProductResearchAgent")]
    ProductResearch,
    #[serde(rename = "MarketAnalysisAgent")]
    MarketAnalysis,
    #[serde(rename = "SalesOpportunityAgent")]
    SalesOpportunity,
    #[serde(rename = "ProductEvaluationAgent")]
    ProductEvaluation,
}

impl AgentKind {
    pub const ALL: [AgentKind; 4] = [
        AgentKind::ProductResearch,
        AgentKind::MarketAnalysis,
        AgentKind::SalesOpportunity,
        AgentKind::ProductEvaluation,
    ];

    /// Registry key for this agent type
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::ProductResearch => "ProductResearchAgent",
            AgentKind::MarketAnalysis => "MarketAnalysisAgent",
            AgentKind::SalesOpportunity => "SalesOpportunityAgent",
            AgentKind::ProductEvaluation => "ProductEvaluationAgent",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown agent type: {s}"))
    }
}
