//! Sales opportunity agent (simulated margin and demand estimates)

use super::Segment;
use crate::agent::handler::{TaskHandler, TaskPayload};
use crate::error::HandlerError;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

pub const SOURCE: &str = "Sales Opportunity Agent (simulated)";

#[derive(Debug, Clone, Default)]
pub struct SalesOpportunityAgent;

impl SalesOpportunityAgent {
    pub fn new() -> Self {
        Self
    }

    fn estimate(segment: Segment) -> Value {
        match segment {
            Segment::Headphones => json!({
                "profit_margin": "42%",
                "estimated_demand": "High",
                "price_sensitivity": "Medium"
            }),
            Segment::Watches => json!({
                "profit_margin": "35%",
                "estimated_demand": "High",
                "price_sensitivity": "High"
            }),
            Segment::Generic => json!({
                "profit_margin": "25-30% (estimated)",
                "estimated_demand": "Medium",
                "price_sensitivity": "Medium"
            }),
        }
    }
}

#[async_trait]
impl TaskHandler for SalesOpportunityAgent {
    async fn process_task(&self, task: &TaskPayload) -> Result<Value, HandlerError> {
        info!(query = %task.query, context = %task.context, "Processing sales opportunity task");

        let mut sales_potential = Self::estimate(Segment::detect(&task.search_text()));
        if let Some(market_size) = task
            .field("market_analysis")
            .and_then(|market| market.get("market_size"))
        {
            sales_potential["addressable_market"] = market_size.clone();
        }

        Ok(json!({
            "result": "success",
            "query": task.query,
            "context": task.context,
            "sales_potential": sales_potential,
            "source": SOURCE,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_headphone_margins() {
        let agent = SalesOpportunityAgent::new();
        let task = TaskPayload::new("profit on headphones", "");

        let result = agent.process_task(&task).await.unwrap();

        assert_eq!(result["sales_potential"]["profit_margin"], "42%");
        assert!(result["sales_potential"].get("addressable_market").is_none());
    }

    #[tokio::test]
    async fn test_uses_forwarded_market_size() {
        let agent = SalesOpportunityAgent::new();
        let task = TaskPayload::new("sales of gadgets", "")
            .with_field("market_analysis", json!({"market_size": "$1 billion"}));

        let result = agent.process_task(&task).await.unwrap();

        assert_eq!(
            result["sales_potential"]["addressable_market"],
            "$1 billion"
        );
        assert_eq!(result["sales_potential"]["estimated_demand"], "Medium");
    }
}
