//! Market analysis agent (simulated market research)

use super::Segment;
use crate::agent::handler::{TaskHandler, TaskPayload};
use crate::error::HandlerError;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

pub const SOURCE: &str = "Market Analysis Agent (simulated)";

#[derive(Debug, Clone, Default)]
pub struct MarketAnalysisAgent;

impl MarketAnalysisAgent {
    pub fn new() -> Self {
        Self
    }

    fn market_data(segment: Segment) -> Value {
        match segment {
            Segment::Headphones => json!({
                "market_size": "$8.7 billion",
                "growth_rate": "12.3% annually",
                "top_competitors": ["Sony", "Bose", "Apple", "Samsung", "Sennheiser"],
                "market_trends": [
                    "Increasing demand for noise cancellation",
                    "Rise in work-from-home setups driving premium audio sales",
                    "Integration with voice assistants",
                    "Growing preference for true wireless options"
                ],
                "consumer_preferences": {
                    "key_features": ["Battery life", "Sound quality", "Comfort", "Noise cancellation"],
                    "price_sensitivity": "Medium - consumers willing to pay premium for quality"
                }
            }),
            Segment::Watches => json!({
                "market_size": "$22.3 billion",
                "growth_rate": "18.2% annually",
                "top_competitors": ["Apple", "Samsung", "Garmin", "Fitbit", "Huawei"],
                "market_trends": [
                    "Integration of health monitoring features",
                    "Longer battery life becoming a key differentiator",
                    "Growing adoption in health and fitness sectors",
                    "Expansion of contactless payment capabilities"
                ],
                "consumer_preferences": {
                    "key_features": ["Health tracking", "Battery life", "Design", "App ecosystem"],
                    "price_sensitivity": "High - strong correlation between price and features"
                }
            }),
            Segment::Generic => json!({
                "market_size": "$5-10 billion (estimated)",
                "growth_rate": "8-15% annually (estimated)",
                "top_competitors": ["Major Brand 1", "Major Brand 2", "Major Brand 3"],
                "market_trends": ["Generic Trend 1", "Generic Trend 2", "Generic Trend 3"],
                "consumer_preferences": {
                    "key_features": ["Quality", "Price", "Brand reputation"],
                    "price_sensitivity": "Medium"
                }
            }),
        }
    }
}

#[async_trait]
impl TaskHandler for MarketAnalysisAgent {
    async fn process_task(&self, task: &TaskPayload) -> Result<Value, HandlerError> {
        info!(query = %task.query, context = %task.context, "Processing market analysis task");

        // Products forwarded by an earlier workflow stage
        let product_count = task
            .field("products")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);

        Ok(json!({
            "result": "success",
            "query": task.query,
            "context": task.context,
            "market_data": Self::market_data(Segment::detect(&task.search_text())),
            "product_count_analyzed": product_count,
            "source": SOURCE,
        }))
    }
}
