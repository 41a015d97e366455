//! Keyword intent classifier
//!
//! Stateless and deterministic. Classification runs in two layers:
//!
//! 1. Plan detection: a request containing a high-level planning phrase is
//!    answered with a canned plan and never delegated.
//! 2. Agent selection: an ordered rule table is scanned top to bottom and the
//!    first rule with any keyword present in the lowercased request wins.
//!    Ties resolve by rule order, not by how many keywords match.

use crate::agent::kind::AgentKind;

/// Phrases that turn a request into a plan directive
pub const PLAN_TRIGGERS: [&str; 3] = ["profitable niche", "drop shipping", "business plan"];

/// Plan returned for every plan directive
pub const PLAN_TEXT: &str = "I will collaborate with experts to answer question";

/// Agent used when no rule matches
pub const DEFAULT_AGENT: AgentKind = AgentKind::ProductResearch;

/// Words dropped from derived context even when long enough
pub const CONTEXT_STOP_WORDS: [&str; 7] = [
    "about",
    "information",
    "what",
    "where",
    "when",
    "would",
    "should",
];

/// Context keeps only tokens longer than this many characters
const MIN_CONTEXT_TOKEN_CHARS: usize = 4;

/// One row of the routing table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentRule {
    pub agent: AgentKind,
    pub keywords: &'static [&'static str],
}

/// Outcome of classifying a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Answer with [`PLAN_TEXT`]; no delegation
    Plan,
    /// Delegate to this agent type
    Delegate(AgentKind),
}

#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    pub fn new() -> Self {
        let rules = vec![
            IntentRule {
                agent: AgentKind::ProductResearch,
                keywords: &["headphones", "product"],
            },
            IntentRule {
                agent: AgentKind::MarketAnalysis,
                keywords: &["market", "watches"],
            },
            IntentRule {
                agent: AgentKind::SalesOpportunity,
                keywords: &["profit", "sales"],
            },
            IntentRule {
                agent: AgentKind::ProductEvaluation,
                keywords: &["evaluate", "score"],
            },
        ];

        Self { rules }
    }

    /// The routing table, in evaluation order
    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    /// Whether the request asks for a high-level plan
    pub fn is_plan_request(&self, request: &str) -> bool {
        let lowered = request.to_lowercase();
        PLAN_TRIGGERS
            .iter()
            .any(|trigger| lowered.contains(trigger))
    }

    /// Pick the agent type for a request; first matching rule wins
    pub fn classify_agent(&self, request: &str) -> AgentKind {
        let lowered = request.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|keyword| lowered.contains(keyword)))
            .map_or(DEFAULT_AGENT, |rule| rule.agent)
    }

    /// Full classification: plan detection first, then the rule table
    pub fn classify(&self, request: &str) -> Intent {
        if self.is_plan_request(request) {
            Intent::Plan
        } else {
            Intent::Delegate(self.classify_agent(request))
        }
    }

    /// Keyword digest of a request used as conversation context
    ///
    /// Lowercases, splits on whitespace, keeps tokens longer than four
    /// characters that are not stop words, and joins them in order.
    pub fn derive_context(&self, request: &str) -> String {
        request
            .to_lowercase()
            .split_whitespace()
            .filter(|token| token.chars().count() > MIN_CONTEXT_TOKEN_CHARS)
            .filter(|token| !CONTEXT_STOP_WORDS.contains(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Reuse an existing context unchanged, or derive one from the request
    pub fn resolve_context(&self, request: &str, existing: Option<&str>) -> String {
        match existing {
            Some(context) => context.to_string(),
            None => self.derive_context(request),
        }
    }
}
