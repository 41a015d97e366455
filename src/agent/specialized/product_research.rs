//! Product research agent (simulated catalogue lookup)

use super::Segment;
use crate::agent::handler::{TaskHandler, TaskPayload};
use crate::error::HandlerError;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

pub const SOURCE: &str = "Product Research Agent (simulated)";

#[derive(Debug, Clone, Default)]
pub struct ProductResearchAgent;

impl ProductResearchAgent {
    pub fn new() -> Self {
        Self
    }

    fn catalogue(segment: Segment) -> Value {
        match segment {
            Segment::Headphones => json!([
                {
                    "name": "SonicWave Pro",
                    "type": "Wireless Headphones",
                    "price": "$129.99",
                    "rating": 4.7,
                    "features": ["Active Noise Cancellation", "40-hour battery", "Bluetooth 5.2"]
                },
                {
                    "name": "AudioPhase X300",
                    "type": "Wireless Headphones",
                    "price": "$199.99",
                    "rating": 4.8,
                    "features": ["Hi-Res Audio", "Spatial sound", "Premium build quality"]
                },
                {
                    "name": "EchoBeats Lite",
                    "type": "Wireless Earbuds",
                    "price": "$89.99",
                    "rating": 4.5,
                    "features": ["Water resistant", "Touch controls", "Compact case"]
                }
            ]),
            Segment::Watches => json!([
                {
                    "name": "TimeKeeper Pro",
                    "type": "Smart Watch",
                    "price": "$249.99",
                    "rating": 4.6,
                    "features": ["Heart rate monitoring", "GPS", "7-day battery"]
                },
                {
                    "name": "FitTrack X2",
                    "type": "Fitness Watch",
                    "price": "$179.99",
                    "rating": 4.4,
                    "features": ["Activity tracking", "Sleep analysis", "Water resistant"]
                }
            ]),
            Segment::Generic => json!([
                {
                    "name": "Generic Product 1",
                    "type": "Electronics",
                    "price": "$99.99",
                    "rating": 4.0,
                    "features": ["Feature 1", "Feature 2", "Feature 3"]
                },
                {
                    "name": "Generic Product 2",
                    "type": "Electronics",
                    "price": "$149.99",
                    "rating": 4.2,
                    "features": ["Feature 1", "Feature 2", "Feature 3"]
                }
            ]),
        }
    }
}

#[async_trait]
impl TaskHandler for ProductResearchAgent {
    async fn process_task(&self, task: &TaskPayload) -> Result<Value, HandlerError> {
        info!(query = %task.query, context = %task.context, "Processing product research task");

        let products = Self::catalogue(Segment::detect(&task.search_text()));
        let total_found = products.as_array().map_or(0, Vec::len);

        Ok(json!({
            "result": "success",
            "query": task.query,
            "context": task.context,
            "products": products,
            "total_found": total_found,
            "source": SOURCE,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_headphone_catalogue() {
        let agent = ProductResearchAgent::new();
        let task = TaskPayload::new("I need information about wireless headphones", "");

        let result = agent.process_task(&task).await.unwrap();

        assert_eq!(result["result"], "success");
        assert_eq!(result["total_found"], 3);
        assert_eq!(result["products"][0]["name"], "SonicWave Pro");
        assert_eq!(result["source"], SOURCE);
    }

    #[tokio::test]
    async fn test_context_selects_segment() {
        let agent = ProductResearchAgent::new();
        let task = TaskPayload::new("What price range?", "interested smart watches");

        let result = agent.process_task(&task).await.unwrap();

        assert_eq!(result["total_found"], 2);
        assert_eq!(result["products"][0]["type"], "Smart Watch");
    }

    #[tokio::test]
    async fn test_generic_fallback_echoes_query() {
        let agent = ProductResearchAgent::new();
        let task = TaskPayload::new("Find trending gadgets", "trending gadgets");

        let result = agent.process_task(&task).await.unwrap();

        assert_eq!(result["query"], "Find trending gadgets");
        assert_eq!(result["products"][0]["name"], "Generic Product 1");
    }
}
