//! Product evaluation agent (simulated viability score)
//!
//! Scores a product opportunity from whatever earlier research is attached
//! to the task: each of products, market analysis and sales potential adds
//! to a base score.

use crate::agent::handler::{TaskHandler, TaskPayload};
use crate::error::HandlerError;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

pub const SOURCE: &str = "Product Evaluation Agent (simulated)";

const BASE_SCORE: u64 = 50;
const PRODUCTS_WEIGHT: u64 = 10;
const MARKET_WEIGHT: u64 = 15;
const SALES_WEIGHT: u64 = 12;

#[derive(Debug, Clone, Default)]
pub struct ProductEvaluationAgent;

impl ProductEvaluationAgent {
    pub fn new() -> Self {
        Self
    }

    fn score(task: &TaskPayload) -> u64 {
        let has_products = task
            .field("products")
            .and_then(Value::as_array)
            .is_some_and(|products| !products.is_empty());

        let mut score = BASE_SCORE;
        if has_products {
            score += PRODUCTS_WEIGHT;
        }
        if task.field("market_analysis").is_some() {
            score += MARKET_WEIGHT;
        }
        if task.field("sales_potential").is_some() {
            score += SALES_WEIGHT;
        }
        score
    }

    fn verdict(score: u64) -> (&'static str, &'static str) {
        match score {
            80.. => ("Recommended for investment", "Low"),
            65..=79 => ("Worth further research", "Medium"),
            _ => ("Not recommended without more data", "High"),
        }
    }
}

#[async_trait]
impl TaskHandler for ProductEvaluationAgent {
    async fn process_task(&self, task: &TaskPayload) -> Result<Value, HandlerError> {
        info!(query = %task.query, context = %task.context, "Processing product evaluation task");

        let score = Self::score(task);
        let (recommendation, risk_level) = Self::verdict(score);

        Ok(json!({
            "result": "success",
            "query": task.query,
            "context": task.context,
            "evaluation": {
                "score": score,
                "recommendation": recommendation,
                "risk_level": risk_level,
            },
            "source": SOURCE,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_full_research_scores_high() {
        let agent = ProductEvaluationAgent::new();
        let task = TaskPayload::new("evaluate headphones", "")
            .with_field("products", json!([{"name": "A"}]))
            .with_field("market_analysis", json!({}))
            .with_field("sales_potential", json!({}));

        let result = agent.process_task(&task).await.unwrap();

        assert_eq!(result["evaluation"]["score"], 87);
        assert_eq!(
            result["evaluation"]["recommendation"],
            "Recommended for investment"
        );
        assert_eq!(result["evaluation"]["risk_level"], "Low");
    }

    #[tokio::test]
    async fn test_no_research_scores_low() {
        let agent = ProductEvaluationAgent::new();
        let task = TaskPayload::new("score this product", "");

        let result = agent.process_task(&task).await.unwrap();

        assert_eq!(result["evaluation"]["score"], 50);
        assert_eq!(result["evaluation"]["risk_level"], "High");
    }

    #[test]
    fn test_verdict_bands() {
        assert_eq!(ProductEvaluationAgent::verdict(75).1, "Medium");
        assert_eq!(ProductEvaluationAgent::verdict(65).1, "Medium");
        assert_eq!(ProductEvaluationAgent::verdict(64).1, "High");
    }

    #[test]
    fn test_empty_products_do_not_count() {
        let task = TaskPayload::new("q", "").with_field("products", json!([]));
        assert_eq!(ProductEvaluationAgent::score(&task), BASE_SCORE);
    }
}
