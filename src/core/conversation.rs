//! # Conversation Store
//!
//! An append-only, chronologically ordered list of turns. Turns are
//! immutable once built: fields are private and only readable through
//! accessors, and the store exposes no way to remove or edit an entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Returns a human-readable label for display
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "you",
            Role::Assistant => "agent",
        }
    }
}

/// One message of the conversation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Turn {
    role: Role,
    content: String,
    created_at: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Ordered sequence of turns for one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a turn to the end and returns a reference to it.
    pub fn append(&mut self, turn: Turn) -> &Turn {
        let index = self.turns.len();
        self.turns.push(turn);
        &self.turns[index]
    }

    /// The full sequence in insertion order.
    pub fn all(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Replaces literal `\n` escape sequences (backslash + `n`) with real line breaks.
pub fn normalize_line_breaks(text: &str) -> String {
    text.replace("\\n", "\n")
}
