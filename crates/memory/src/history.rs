//! Per-user conversation history with a bounded window.
//!
//! The store is the only shared mutable state in the system. Each user
//! id owns one lazily-created [`Session`] behind its own async mutex;
//! the dispatch loop holds that mutex across the whole
//! load → model call → append sequence, so two concurrent requests for
//! the same user serialize instead of racing on create-if-absent or
//! append ordering. Requests for different users only contend on the
//! brief map lock.
//!
//! Nothing here is persisted: sessions live for the process lifetime
//! and are never destroyed.

use sommelier_core::message::Turn;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// One user's recorded conversation.
///
/// Retains at most `window` recent turn pairs; the oldest turns are
/// evicted first when the bound is exceeded.
pub struct Session {
    turns: Vec<Turn>,
    window: usize,
}

impl Session {
    fn new(window: usize) -> Self {
        Self {
            turns: Vec::new(),
            window,
        }
    }

    /// Append a user turn.
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.push(Turn::user(text));
    }

    /// Append an assistant turn.
    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.push(Turn::assistant(text));
    }

    fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
        while self.turns.len() > self.window * 2 {
            self.turns.remove(0);
        }
    }

    /// The most recent `pairs` turn pairs (at most `2 * pairs` turns),
    /// in chronological order.
    pub fn recent(&self, pairs: usize) -> &[Turn] {
        let keep = pairs * 2;
        let start = self.turns.len().saturating_sub(keep);
        &self.turns[start..]
    }

    /// Total turns currently retained.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Process-wide conversation store, keyed by user id.
pub struct ConversationStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
    window: usize,
}

impl ConversationStore {
    /// Create a store retaining `window` turn pairs per user.
    pub fn new(window: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            window,
        }
    }

    /// Get the session for a user id, creating it on first use.
    ///
    /// The returned handle's mutex is the per-user serialization point:
    /// hold it across the whole load → call → append sequence.
    pub async fn session(&self, user_id: &str) -> Arc<Mutex<Session>> {
        if let Some(session) = self.sessions.read().await.get(user_id) {
            return session.clone();
        }

        let mut sessions = self.sessions.write().await;
        // Re-check under the write lock: another request may have
        // created the session between our read and write.
        sessions
            .entry(user_id.to_string())
            .or_insert_with(|| {
                debug!(user_id, "Creating conversation session");
                Arc::new(Mutex::new(Session::new(self.window)))
            })
            .clone()
    }

    /// Number of users with a session.
    pub async fn user_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
