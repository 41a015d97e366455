//! Task handler capability
//!
//! Every specialized agent implements [`TaskHandler`]: one payload in, one
//! result document out. The router only relies on that contract; by
//! convention results carry a `result` status field and a `source` label.

use crate::error::HandlerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Task sent to a handler
///
/// `query` and `context` are always present; workflow stages add the outputs
/// of earlier stages as extra top-level fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPayload {
    pub query: String,
    #[serde(default)]
    pub context: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskPayload {
    pub fn new<Q: Into<String>, C: Into<String>>(query: Q, context: C) -> Self {
        Self {
            query: query.into(),
            context: context.into(),
            extra: Map::new(),
        }
    }

    /// Builder method to attach an extra field
    pub fn with_field<K: Into<String>>(mut self, key: K, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Look up an extra field
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Lowercased query and context, for keyword matching in handlers
    pub fn search_text(&self) -> String {
        format!("{} {}", self.query, self.context).to_lowercase()
    }
}

/// Capability implemented by every specialized agent
#[async_trait]
pub trait TaskHandler: Send + Sync {
    /// Process a task and return the result document
    async fn process_task(&self, task: &TaskPayload) -> Result<Value, HandlerError>;
}

/// Adapter turning a synchronous closure into a [`TaskHandler`]
pub struct FnHandler<F> {
    f: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&TaskPayload) -> Result<Value, HandlerError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> TaskHandler for FnHandler<F>
where
    F: Fn(&TaskPayload) -> Result<Value, HandlerError> + Send + Sync,
{
    async fn process_task(&self, task: &TaskPayload) -> Result<Value, HandlerError> {
        (self.f)(task)
    }
}

/// Wrap a closure as a shareable handler
pub fn handler_fn<F>(f: F) -> Arc<dyn TaskHandler>
where
    F: Fn(&TaskPayload) -> Result<Value, HandlerError> + Send + Sync + 'static,
{
    Arc::new(FnHandler::new(f))
}
