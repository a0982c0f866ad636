//! Session Registry
//!
//! Process-wide table of live sessions. Two levels of locking: the table
//! mutex guards membership only and is never held across collaborator calls;
//! each session sits behind its own `Arc<Mutex<_>>` so racing requests for
//! the same id serialize instead of interleaving turn counts.

use crate::language::Language;
use crate::session::Session;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session '{0}' not found")]
    NotFound(String),
    #[error("Session '{0}' already exists")]
    Duplicate(String),
}

/// Shared handle to one session.
pub type SessionHandle = Arc<Mutex<Session>>;

#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, SessionHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new session. Duplicate ids are rejected rather than
    /// silently overwritten so a client bug cannot wipe a running session.
    pub async fn create(
        &self,
        session_id: &str,
        topic: &str,
        lesson_content: &str,
        language: Language,
    ) -> Result<SessionHandle, SessionError> {
        let mut sessions = self.sessions.lock().await;
        if sessions.contains_key(session_id) {
            return Err(SessionError::Duplicate(session_id.to_string()));
        }
        let handle = Arc::new(Mutex::new(Session::new(
            session_id,
            topic,
            lesson_content,
            language,
        )));
        sessions.insert(session_id.to_string(), Arc::clone(&handle));
        info!(session_id, %language, "session created");
        Ok(handle)
    }

    /// Looks up a live session by id.
    pub async fn get(&self, session_id: &str) -> Result<SessionHandle, SessionError> {
        self.sessions
            .lock()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))
    }

    /// Removes a session. Idempotent: removing an absent id is a no-op.
    /// Returns whether an entry existed.
    pub async fn remove(&self, session_id: &str) -> bool {
        let existed = self.sessions.lock().await.remove(session_id).is_some();
        if existed {
            info!(session_id, "session ended");
        }
        existed
    }

    /// Evicts sessions idle longer than `ttl`. Returns the eviction count.
    ///
    /// A session mid-request is still reachable through the handles already
    /// cloned out of the table; eviction only forgets the id.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.lock().await;
        let mut expired = Vec::new();
        for (id, handle) in sessions.iter() {
            if let Ok(session) = handle.try_lock() {
                if session.idle_for() >= ttl {
                    expired.push(id.clone());
                }
            }
        }
        for id in &expired {
            sessions.remove(id);
            info!(session_id = %id, "session evicted after idle timeout");
        }
        expired.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
