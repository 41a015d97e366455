//! Error taxonomy for the orchestrator
//!
//! Three failure classes reach callers: the platform gate was not passed
//! (`NotReady`), no handler is registered for the classified agent type
//! (`DelegationTargetNotFound`), or a registered handler failed while
//! processing (`HandlerFailure`). The first two become top-level error
//! envelopes; the last is reported as a soft field inside a success envelope.

use crate::config::ConfigError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_ERROR_MESSAGE_LEN: usize = 500;

static SECRET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(password|passwd|token|api[_-]?key|access[_-]?key|secret)\b\s*[=:]\s*\S+")
        .expect("secret pattern is valid")
});

static CREDENTIAL_PATH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/[a-zA-Z0-9._/-]+/(secrets?|\.ssh|\.aws|\.config)/[a-zA-Z0-9._/-]+")
        .expect("credential path pattern is valid")
});

/// Failure raised by a task handler while processing a payload
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HandlerError {
    #[error("Task processing failed: {0}")]
    ProcessingFailed(String),

    #[error("Invalid task: {0}")]
    InvalidTask(String),
}

impl HandlerError {
    pub fn processing_failed<S: Into<String>>(message: S) -> Self {
        Self::ProcessingFailed(message.into())
    }

    pub fn invalid_task<S: Into<String>>(message: S) -> Self {
        Self::InvalidTask(message.into())
    }
}

/// Main error type for routing, delegation and workflow operations
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("Orchestrator agent is not ready: {message}")]
    NotReady { message: String },

    #[error("Agent '{agent_type}' is not registered with the orchestrator")]
    DelegationTargetNotFound { agent_type: String },

    #[error("Agent '{agent_type}' failed: {source}")]
    HandlerFailure {
        agent_type: String,
        #[source]
        source: HandlerError,
    },

    #[error("Workflow stage '{stage}' failed: {message}")]
    WorkflowStageFailed { stage: String, message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),
}

/// Error fields carried by an error envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Short, stable headline for the failure class
    pub message: String,
    /// Sanitized diagnostic text
    pub error: String,
}

impl RouterError {
    pub fn not_ready<S: Into<String>>(message: S) -> Self {
        Self::NotReady {
            message: message.into(),
        }
    }

    pub fn delegation_target_not_found<S: Into<String>>(agent_type: S) -> Self {
        Self::DelegationTargetNotFound {
            agent_type: agent_type.into(),
        }
    }

    pub fn handler_failure<S: Into<String>>(agent_type: S, source: HandlerError) -> Self {
        Self::HandlerFailure {
            agent_type: agent_type.into(),
            source,
        }
    }

    pub fn workflow_stage_failed<S: Into<String>, M: Into<String>>(stage: S, message: M) -> Self {
        Self::WorkflowStageFailed {
            stage: stage.into(),
            message: message.into(),
        }
    }

    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Convert into the `message`/`error` pair published in error envelopes
    pub fn to_error_details(&self) -> ErrorDetails {
        let (headline, detail) = match self {
            RouterError::NotReady { message } => {
                ("Orchestrator agent is not ready", message.clone())
            }
            RouterError::DelegationTargetNotFound { .. } => {
                ("No agent available to handle request", self.to_string())
            }
            RouterError::HandlerFailure { .. } => ("Agent failed to process task", self.to_string()),
            RouterError::WorkflowStageFailed { .. } => ("Workflow failed", self.to_string()),
            RouterError::InvalidInput { .. } => ("Invalid request", self.to_string()),
            RouterError::ConfigError(_) => ("Configuration error", self.to_string()),
        };

        ErrorDetails {
            message: headline.to_string(),
            error: sanitize_error_message(&detail),
        }
    }
}

/// Redact secrets and credential paths, then cap the length
pub fn sanitize_error_message(message: &str) -> String {
    let mut sanitized = SECRET_PATTERN
        .replace_all(message, "${1}=***")
        .to_string();

    sanitized = CREDENTIAL_PATH_PATTERN
        .replace_all(&sanitized, "/***REDACTED***/")
        .to_string();

    if sanitized.len() > MAX_ERROR_MESSAGE_LEN {
        let truncate_suffix = "...[truncated]";
        let mut cut = MAX_ERROR_MESSAGE_LEN - truncate_suffix.len();
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized = format!("{}{}", &sanitized[..cut], truncate_suffix);
    }

    sanitized
}

/// Result type for orchestrator operations
pub type RouterResult<T> = Result<T, RouterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_ready_details_carry_status_message() {
        let error = RouterError::not_ready("Failed to initialize platform: no project");

        let details = error.to_error_details();

        assert_eq!(details.message, "Orchestrator agent is not ready");
        assert_eq!(details.error, "Failed to initialize platform: no project");
    }

    #[test]
    fn test_delegation_target_not_found_names_agent() {
        let error = RouterError::delegation_target_not_found("MarketAnalysisAgent");

        assert!(matches!(error, RouterError::DelegationTargetNotFound { .. }));
        let details = error.to_error_details();
        assert_eq!(details.message, "No agent available to handle request");
        assert!(details.error.contains("MarketAnalysisAgent"));
    }

    #[test]
    fn test_handler_failure_keeps_source() {
        let error = RouterError::handler_failure(
            "ProductResearchAgent",
            HandlerError::processing_failed("catalogue offline"),
        );

        assert!(error.to_string().contains("catalogue offline"));
        let source = std::error::Error::source(&error).expect("source should be set");
        assert_eq!(source.to_string(), "Task processing failed: catalogue offline");
    }

    #[test]
    fn test_error_details_sanitized() {
        let error = RouterError::not_ready("Authentication error: token=abc123 rejected");

        let details = error.to_error_details();

        assert!(!details.error.contains("abc123"));
        assert!(details.error.contains("token=***"));
    }

    #[test]
    fn test_sanitize_multiple_secrets() {
        let message = "Auth failed: password=pass1 api_key=key123 secret=hidden";
        let sanitized = sanitize_error_message(message);

        assert!(!sanitized.contains("pass1"));
        assert!(!sanitized.contains("key123"));
        assert!(!sanitized.contains("hidden"));
        assert!(sanitized.contains("password=***"));
    }

    #[test]
    fn test_sanitize_ignores_secret_words_inside_longer_words() {
        let cases = [
            "Task processing failed: monkey: bananas",
            "lookup key: sku-123 missing",
            "tokenizer: vocabulary missing",
            "Bad keyword=premium",
        ];

        for message in cases {
            assert_eq!(sanitize_error_message(message), message, "Altered: {message}");
        }
    }

    #[test]
    fn test_sanitize_redacts_secret_assignments() {
        assert_eq!(sanitize_error_message("token=abc"), "token=***");
        assert_eq!(
            sanitize_error_message("upstream said API-KEY: sk-live-9"),
            "upstream said API-KEY=***"
        );
        assert_eq!(
            sanitize_error_message("login failed, password = hunter2"),
            "login failed, password=***"
        );
    }

    #[test]
    fn test_credential_path_redaction() {
        let message = "Credentials file /home/user/.config/gcloud/adc.json is unreadable";
        let sanitized = sanitize_error_message(message);

        assert!(sanitized.contains("/***REDACTED***/"));
        assert!(!sanitized.contains("gcloud/adc.json"));
    }

    #[test]
    fn test_long_message_truncation() {
        let sanitized = sanitize_error_message(&"x".repeat(600));

        assert!(sanitized.len() <= MAX_ERROR_MESSAGE_LEN);
        assert!(sanitized.ends_with("...[truncated]"));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let sanitized = sanitize_error_message(&"é".repeat(400));

        assert!(sanitized.len() <= MAX_ERROR_MESSAGE_LEN);
        assert!(sanitized.ends_with("...[truncated]"));
    }

    #[test]
    fn test_sanitize_empty_message() {
        assert_eq!(sanitize_error_message(""), "");
    }
}
