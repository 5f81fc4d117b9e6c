//! Per-user conversation sessions.
//!
//! `Idle` is the absence of a session record; terminal transitions clear
//! the slot. Each user has their own async mutex so events for the same
//! user serialize in arrival order while distinct users never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::Mutex;

/// Conversation state for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// Waiting for the user to send a name.
    AwaitingName,
    /// Name collected; waiting for a background source.
    AwaitingSource { name: String },
}

/// A user's session slot. `None` means no active conversation.
pub type SessionSlot = Arc<Mutex<Option<Session>>>;

/// Map from user id to session slot.
#[derive(Debug, Default)]
pub struct SessionStore {
    slots: StdMutex<HashMap<i64, SessionSlot>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the slot for a user.
    ///
    /// The caller locks the returned mutex for the whole handling of one
    /// event; that lock is the per-user serialization point.
    pub fn slot(&self, user_id: i64) -> SessionSlot {
        let mut slots = self.slots.lock().expect("session map poisoned");
        Arc::clone(slots.entry(user_id).or_default())
    }

    /// Drop the map entry for a user whose conversation has ended.
    ///
    /// A slot still referenced by an in-flight handler is left alone so
    /// a concurrent event keeps observing the same mutex.
    pub fn release(&self, user_id: i64) {
        let mut slots = self.slots.lock().expect("session map poisoned");
        let idle = slots.get(&user_id).is_some_and(|slot| {
            Arc::strong_count(slot) == 1
                && slot.try_lock().map(|guard| guard.is_none()).unwrap_or(false)
        });
        if idle {
            slots.remove(&user_id);
        }
    }

    /// Whether the user currently has an active session.
    pub fn is_active(&self, user_id: i64) -> bool {
        let slots = self.slots.lock().expect("session map poisoned");
        slots.get(&user_id).is_some_and(|slot| {
            slot.try_lock().map(|guard| guard.is_some()).unwrap_or(true)
        })
    }

    /// Number of tracked users (active or awaiting release).
    pub fn len(&self) -> usize {
        self.slots.lock().expect("session map poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_slot_is_shared_per_user() {
        let store = SessionStore::new();

        {
            let slot = store.slot(1);
            *slot.lock().await = Some(Session::AwaitingName);
        }

        let slot = store.slot(1);
        assert_eq!(*slot.lock().await, Some(Session::AwaitingName));
        assert!(store.is_active(1));
        assert!(!store.is_active(2));
    }

    #[tokio::test]
    async fn test_release_removes_idle_slot() {
        let store = SessionStore::new();

        {
            let slot = store.slot(1);
            *slot.lock().await = Some(Session::AwaitingName);
            *slot.lock().await = None;
        }
        assert_eq!(store.len(), 1);

        store.release(1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_release_keeps_active_session() {
        let store = SessionStore::new();

        {
            let slot = store.slot(1);
            *slot.lock().await = Some(Session::AwaitingSource {
                name: "Ana".to_string(),
            });
        }

        store.release(1);
        assert!(store.is_active(1));
    }

    #[tokio::test]
    async fn test_release_skips_referenced_slot() {
        let store = SessionStore::new();

        let held = store.slot(1);
        store.release(1);
        assert_eq!(store.len(), 1, "slot held elsewhere must survive release");
        drop(held);

        store.release(1);
        assert!(store.is_empty());
    }
}
