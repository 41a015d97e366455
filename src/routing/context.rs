//! Conversation context store
//!
//! Maps a conversation/request id to a short context string. A context is
//! written exactly once per id; later writes for the same id are no-ops that
//! return the stored value. Contexts live for the lifetime of the process.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

/// How a context string was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextOrigin {
    /// Keyword digest of the first request
    Derived,
    /// Verbatim text of a plan request
    PlanRequest,
}

/// Stored context for one conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub conversation_id: String,
    pub text: String,
    pub origin: ContextOrigin,
    pub created_at: DateTime<Utc>,
}

/// Thread-safe, write-once context store
#[derive(Debug, Clone, Default)]
pub struct ContextStore {
    contexts: Arc<RwLock<HashMap<String, ConversationContext>>>,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, conversation_id: &str) -> Option<ConversationContext> {
        let contexts = self.contexts.read().unwrap_or_else(PoisonError::into_inner);
        contexts.get(conversation_id).cloned()
    }

    /// Context text only
    pub fn get_text(&self, conversation_id: &str) -> Option<String> {
        self.get(conversation_id).map(|context| context.text)
    }

    pub fn contains(&self, conversation_id: &str) -> bool {
        let contexts = self.contexts.read().unwrap_or_else(PoisonError::into_inner);
        contexts.contains_key(conversation_id)
    }

    /// Store a context unless one already exists; returns whatever is stored
    pub fn set<I: Into<String>, T: Into<String>>(
        &self,
        conversation_id: I,
        text: T,
        origin: ContextOrigin,
    ) -> ConversationContext {
        let text = text.into();
        self.get_or_insert_with(conversation_id, origin, move || text)
            .0
    }

    /// Return the stored context, creating it with `make_text` if absent
    ///
    /// The boolean is `true` when this call created the entry.
    pub fn get_or_insert_with<I, F>(
        &self,
        conversation_id: I,
        origin: ContextOrigin,
        make_text: F,
    ) -> (ConversationContext, bool)
    where
        I: Into<String>,
        F: FnOnce() -> String,
    {
        let conversation_id = conversation_id.into();
        let mut contexts = self.contexts.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = contexts.get(&conversation_id) {
            debug!(
                conversation_id = %conversation_id,
                context = %existing.text,
                "Using existing context"
            );
            return (existing.clone(), false);
        }

        let context = ConversationContext {
            conversation_id: conversation_id.clone(),
            text: make_text(),
            origin,
            created_at: Utc::now(),
        };
        debug!(
            conversation_id = %conversation_id,
            context = %context.text,
            "Stored new context"
        );
        contexts.insert(conversation_id, context.clone());
        (context, true)
    }

    pub fn len(&self) -> usize {
        let contexts = self.contexts.read().unwrap_or_else(PoisonError::into_inner);
        contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-conversation async locks
///
/// Holding the guard for a whole routing call serializes turns of one
/// conversation while different conversations run concurrently. An entry
/// exists only while some turn holds or waits for it.
#[derive(Debug, Clone, Default)]
pub struct ConversationLocks {
    locks: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, conversation_id: &str) -> ConversationTurn {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks
                .entry(conversation_id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        ConversationTurn {
            guard: Some(lock.lock_owned().await),
            conversation_id: conversation_id.to_string(),
            locks: Arc::clone(&self.locks),
        }
    }

    /// Number of conversations with a turn in progress or waiting
    pub fn len(&self) -> usize {
        let locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exclusive turn on one conversation; releases the lock on drop
#[derive(Debug)]
pub struct ConversationTurn {
    guard: Option<OwnedMutexGuard<()>>,
    conversation_id: String,
    locks: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl Drop for ConversationTurn {
    fn drop(&mut self) {
        let Some(guard) = self.guard.take() else {
            return;
        };
        let lock = Arc::clone(OwnedMutexGuard::mutex(&guard));
        drop(guard);

        // Map lock held so no new acquirer can clone the entry meanwhile
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        let idle = locks
            .get(&self.conversation_id)
            .is_some_and(|entry| Arc::ptr_eq(entry, &lock) && Arc::strong_count(&lock) == 2);
        if idle {
            locks.remove(&self.conversation_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_set_and_get() {
        let store = ContextStore::new();
        assert!(store.is_empty());

        let stored = store.set("conv-1", "wireless headphones", ContextOrigin::Derived);

        assert_eq!(stored.text, "wireless headphones");
        assert!(store.contains("conv-1"));
        assert_eq!(store.get_text("conv-1").as_deref(), Some("wireless headphones"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_set_is_write_once() {
        let store = ContextStore::new();
        store.set("conv-1", "wireless headphones", ContextOrigin::Derived);

        let second = store.set("conv-1", "price range", ContextOrigin::Derived);

        assert_eq!(second.text, "wireless headphones");
        assert_eq!(store.get_text("conv-1").as_deref(), Some("wireless headphones"));
    }

    #[test]
    fn test_get_or_insert_with_skips_factory_when_present() {
        let store = ContextStore::new();
        store.set("conv-1", "first", ContextOrigin::PlanRequest);

        let (context, inserted) = store.get_or_insert_with("conv-1", ContextOrigin::Derived, || {
            panic!("factory must not run for an existing context")
        });

        assert!(!inserted);
        assert_eq!(context.text, "first");
        assert_eq!(context.origin, ContextOrigin::PlanRequest);
    }

    #[test]
    fn test_missing_context() {
        let store = ContextStore::new();
        assert!(store.get("nope").is_none());
        assert!(!store.contains("nope"));
    }

    #[tokio::test]
    async fn test_same_conversation_lock_is_exclusive() {
        let locks = ConversationLocks::new();
        let guard = locks.acquire("conv-1").await;

        let contended =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire("conv-1")).await;
        assert!(contended.is_err(), "second acquire should wait");

        drop(guard);
        let reacquired =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire("conv-1")).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn test_finished_turns_leave_no_lock_entries() {
        let locks = ConversationLocks::new();

        for i in 0..1_000 {
            drop(locks.acquire(&format!("conv-{i}")).await);
        }

        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_waiting_turn_keeps_entry_until_it_finishes() {
        let locks = ConversationLocks::new();
        let first = locks.acquire("conv-1").await;

        let waiter = tokio::spawn({
            let locks = locks.clone();
            async move {
                let _turn = locks.acquire("conv-1").await;
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(first);
        assert_eq!(locks.len(), 1, "waiter still needs the entry");

        waiter.await.unwrap();
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_different_conversations_do_not_block() {
        let locks = ConversationLocks::new();
        let _guard = locks.acquire("conv-1").await;

        let other = tokio::time::timeout(Duration::from_millis(50), locks.acquire("conv-2")).await;
        assert!(other.is_ok());
    }
}
