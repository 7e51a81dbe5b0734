//! Conversation types and the in-memory message store

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

static NEXT_TURN_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of a turn. Later turns always compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TurnId(u64);

impl TurnId {
    fn next() -> Self {
        Self(NEXT_TURN_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "turn-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    id: TurnId,
    content: String,
    role: Role,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    used_web_search: Option<bool>,
}

impl Turn {
    /// A user turn records the toggle value that was sent with it.
    pub fn user(content: impl Into<String>, web_search_enabled: bool) -> Self {
        Self::new(Role::User, content.into(), Some(web_search_enabled))
    }

    /// An assistant turn records whatever the server reported, if anything.
    pub fn assistant(content: impl Into<String>, used_web_search: Option<bool>) -> Self {
        Self::new(Role::Assistant, content.into(), used_web_search)
    }

    fn new(role: Role, content: String, used_web_search: Option<bool>) -> Self {
        Self {
            id: TurnId::next(),
            content,
            role,
            created_at: Utc::now(),
            used_web_search,
        }
    }

    pub fn id(&self) -> TurnId {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn used_web_search(&self) -> Option<bool> {
        self.used_web_search
    }
}

/// Append-only log of turns in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    turns: Vec<Turn>,
}

impl MessageStore {
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Iterate over every turn, oldest first. Call again to restart.
    pub fn all(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
