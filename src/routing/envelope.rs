//! Response envelopes
//!
//! [`RouteResult`] is the typed outcome of one routing call. On the wire it
//! becomes a flat [`RouteEnvelope`] record with a `status` field and only the
//! fields that belong to its variant.

use crate::error::{ErrorDetails, RouterError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level envelope status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Error,
}

/// What a successful routing call did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteAction {
    PlanGenerated,
    Delegation,
}

/// Result of invoking the selected handler
#[derive(Debug, Clone, PartialEq)]
pub enum DelegationOutcome {
    /// Handler result, verbatim
    Response(Value),
    /// Handler failed; the delegation itself still counts as a success
    Failed(String),
}

/// Outcome of a routing call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "RouteEnvelope")]
pub enum RouteResult {
    Error {
        details: ErrorDetails,
        request_id: Option<String>,
    },
    PlanGenerated {
        plan: String,
        request_id: String,
    },
    Delegated {
        agent_type: String,
        request_id: String,
        context: String,
        outcome: DelegationOutcome,
    },
}

/// Flat wire form of a [`RouteResult`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEnvelope {
    pub status: EnvelopeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<RouteAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegated_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RouteEnvelope {
    fn empty(status: EnvelopeStatus) -> Self {
        Self {
            status,
            action: None,
            plan: None,
            delegated_to: None,
            request_id: None,
            context: None,
            agent_response: None,
            agent_error: None,
            message: None,
            error: None,
        }
    }
}

impl From<RouteResult> for RouteEnvelope {
    fn from(result: RouteResult) -> Self {
        match result {
            RouteResult::Error {
                details,
                request_id,
            } => RouteEnvelope {
                request_id,
                message: Some(details.message),
                error: Some(details.error),
                ..RouteEnvelope::empty(EnvelopeStatus::Error)
            },
            RouteResult::PlanGenerated { plan, request_id } => RouteEnvelope {
                action: Some(RouteAction::PlanGenerated),
                plan: Some(plan),
                request_id: Some(request_id),
                ..RouteEnvelope::empty(EnvelopeStatus::Success)
            },
            RouteResult::Delegated {
                agent_type,
                request_id,
                context,
                outcome,
            } => {
                let (agent_response, agent_error) = match outcome {
                    DelegationOutcome::Response(value) => (Some(value), None),
                    DelegationOutcome::Failed(message) => (None, Some(message)),
                };
                RouteEnvelope {
                    action: Some(RouteAction::Delegation),
                    delegated_to: Some(agent_type),
                    request_id: Some(request_id),
                    context: Some(context),
                    agent_response,
                    agent_error,
                    ..RouteEnvelope::empty(EnvelopeStatus::Success)
                }
            }
        }
    }
}

impl RouteResult {
    /// Error envelope for a routing failure
    pub fn from_error(error: &RouterError, request_id: Option<String>) -> Self {
        RouteResult::Error {
            details: error.to_error_details(),
            request_id,
        }
    }

    pub fn status(&self) -> EnvelopeStatus {
        match self {
            RouteResult::Error { .. } => EnvelopeStatus::Error,
            _ => EnvelopeStatus::Success,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() == EnvelopeStatus::Success
    }

    pub fn action(&self) -> Option<RouteAction> {
        match self {
            RouteResult::Error { .. } => None,
            RouteResult::PlanGenerated { .. } => Some(RouteAction::PlanGenerated),
            RouteResult::Delegated { .. } => Some(RouteAction::Delegation),
        }
    }

    pub fn request_id(&self) -> Option<&str> {
        match self {
            RouteResult::Error { request_id, .. } => request_id.as_deref(),
            RouteResult::PlanGenerated { request_id, .. }
            | RouteResult::Delegated { request_id, .. } => Some(request_id),
        }
    }

    pub fn plan(&self) -> Option<&str> {
        match self {
            RouteResult::PlanGenerated { plan, .. } => Some(plan),
            _ => None,
        }
    }

    pub fn delegated_to(&self) -> Option<&str> {
        match self {
            RouteResult::Delegated { agent_type, .. } => Some(agent_type),
            _ => None,
        }
    }

    pub fn context(&self) -> Option<&str> {
        match self {
            RouteResult::Delegated { context, .. } => Some(context),
            _ => None,
        }
    }

    pub fn agent_response(&self) -> Option<&Value> {
        match self {
            RouteResult::Delegated {
                outcome: DelegationOutcome::Response(value),
                ..
            } => Some(value),
            _ => None,
        }
    }

    pub fn agent_error(&self) -> Option<&str> {
        match self {
            RouteResult::Delegated {
                outcome: DelegationOutcome::Failed(message),
                ..
            } => Some(message),
            _ => None,
        }
    }

    pub fn error_details(&self) -> Option<&ErrorDetails> {
        match self {
            RouteResult::Error { details, .. } => Some(details),
            _ => None,
        }
    }

    /// Flat wire form
    pub fn to_envelope(&self) -> RouteEnvelope {
        self.clone().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plan_envelope_fields() {
        let result = RouteResult::PlanGenerated {
            plan: "I will collaborate with experts to answer question".to_string(),
            request_id: "req-1".to_string(),
        };

        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(
            value,
            json!({
                "status": "success",
                "action": "plan_generated",
                "plan": "I will collaborate with experts to answer question",
                "request_id": "req-1"
            })
        );
    }

    #[test]
    fn test_delegation_envelope_with_response() {
        let result = RouteResult::Delegated {
            agent_type: "ProductResearchAgent".to_string(),
            request_id: "req-1".to_string(),
            context: "trending gadgets".to_string(),
            outcome: DelegationOutcome::Response(json!({"result": "success"})),
        };

        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["status"], "success");
        assert_eq!(value["action"], "delegation");
        assert_eq!(value["delegated_to"], "ProductResearchAgent");
        assert_eq!(value["context"], "trending gadgets");
        assert_eq!(value["agent_response"]["result"], "success");
        assert!(value.get("agent_error").is_none());
    }

    #[test]
    fn test_delegation_envelope_with_handler_failure() {
        let result = RouteResult::Delegated {
            agent_type: "MarketAnalysisAgent".to_string(),
            request_id: "req-2".to_string(),
            context: String::new(),
            outcome: DelegationOutcome::Failed("Task processing failed: boom".to_string()),
        };

        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["status"], "success");
        assert_eq!(value["agent_error"], "Task processing failed: boom");
        assert!(value.get("agent_response").is_none());
        assert_eq!(result.agent_error(), Some("Task processing failed: boom"));
    }

    #[test]
    fn test_error_envelope_omits_delegation_fields() {
        let error = RouterError::delegation_target_not_found("SalesOpportunityAgent");
        let result = RouteResult::from_error(&error, Some("req-3".to_string()));

        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["status"], "error");
        assert_eq!(value["request_id"], "req-3");
        assert!(value.get("delegated_to").is_none());
        assert!(value.get("context").is_none());
        assert!(value.get("action").is_none());
        assert!(value["error"]
            .as_str()
            .unwrap()
            .contains("SalesOpportunityAgent"));
        assert!(!result.is_success());
    }

    #[test]
    fn test_envelope_parses_back() {
        let result = RouteResult::PlanGenerated {
            plan: "plan".to_string(),
            request_id: "req-4".to_string(),
        };
        let text = serde_json::to_string(&result).unwrap();

        let envelope: RouteEnvelope = serde_json::from_str(&text).unwrap();

        assert_eq!(envelope, result.to_envelope());
    }
}
