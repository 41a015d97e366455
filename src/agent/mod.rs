//! Specialized task handlers and the registry the orchestrator delegates through
//!
//! Handlers are opaque to the router: each accepts a [`TaskPayload`] and
//! returns a JSON result document, or fails with a [`HandlerError`](crate::error::HandlerError).

pub mod handler;
pub mod kind;
pub mod registry;
pub mod specialized;

pub use handler::{handler_fn, FnHandler, TaskHandler, TaskPayload};
pub use kind::AgentKind;
pub use registry::AgentRegistry;
