//! Request routing
//!
//! - `classifier`: plan detection, keyword rule table, context derivation
//! - `context`: write-once conversation context and per-conversation locks
//! - `envelope`: typed route results and their flat wire form
//! - `router`: the [`Orchestrator`] tying these to the agent registry

pub mod classifier;
pub mod context;
pub mod envelope;
pub mod router;

pub use classifier::{Intent, IntentClassifier, IntentRule, DEFAULT_AGENT, PLAN_TEXT, PLAN_TRIGGERS};
pub use context::{
    ContextOrigin, ContextStore, ConversationContext, ConversationLocks, ConversationTurn,
};
pub use envelope::{DelegationOutcome, EnvelopeStatus, RouteAction, RouteEnvelope, RouteResult};
pub use router::Orchestrator;
