//! Conversation Session State
//!
//! A `Session` is one turn-limited practice conversation: an append-only
//! history of turns and a counter that drives the active → final transition.
//! The session itself performs no I/O; the engine owns the collaborator calls.

use crate::assessment::Assessment;
use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Number of user turns after which a session produces its final assessment.
pub const MAX_TURNS: u32 = 10;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One utterance within a session's history. Immutable once appended.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The outcome of one accepted user message.
///
/// Serialized in the wire shape the clients consume: a boolean `is_final`
/// plus either the assistant's reply text or the one-time assessment object.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnResult {
    Reply { message: String },
    Final { assessment: Assessment },
}

impl TurnResult {
    pub fn is_final(&self) -> bool {
        matches!(self, TurnResult::Final { .. })
    }
}

impl Serialize for TurnResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        match self {
            TurnResult::Reply { message } => {
                let mut s = serializer.serialize_struct("TurnResult", 2)?;
                s.serialize_field("is_final", &false)?;
                s.serialize_field("message", message)?;
                s.end()
            }
            TurnResult::Final { assessment } => {
                let mut s = serializer.serialize_struct("TurnResult", 2)?;
                s.serialize_field("is_final", &true)?;
                s.serialize_field("assessment", assessment)?;
                s.end()
            }
        }
    }
}

/// One tutoring conversation, keyed by a caller-supplied identifier.
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: String,
    pub topic: String,
    pub lesson_content: String,
    pub language: Language,
    history: Vec<Turn>,
    turn_count: u32,
    last_active: Instant,
}

impl Session {
    pub fn new(
        session_id: impl Into<String>,
        topic: impl Into<String>,
        lesson_content: impl Into<String>,
        language: Language,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            topic: topic.into(),
            lesson_content: lesson_content.into(),
            language,
            history: Vec::new(),
            turn_count: 0,
            last_active: Instant::now(),
        }
    }

    /// Appends a user turn and advances the turn counter.
    ///
    /// This is the only place `turn_count` changes; it increases by exactly
    /// one per accepted user message.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.history.push(Turn::user(content));
        self.turn_count += 1;
        self.last_active = Instant::now();
    }

    /// Appends an assistant turn. Does not affect the turn counter.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.history.push(Turn::assistant(content));
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn max_turns(&self) -> u32 {
        MAX_TURNS
    }

    /// True once the turn limit has been reached. There is no way back: a
    /// final session is expected to be ended by the caller, not reused.
    pub fn is_final(&self) -> bool {
        self.turn_count >= MAX_TURNS
    }

    /// How long since the last accepted user message (or creation).
    pub fn idle_for(&self) -> std::time::Duration {
        self.last_active.elapsed()
    }
}
