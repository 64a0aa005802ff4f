//! # Session
//!
//! The explicitly owned state of one chat session: its identity, the
//! conversation, and the busy flag. Created once at startup and shared
//! by `Arc` between the turn controller and the presentation layer.
//!
//! ```text
//! Session
//! ├── id: SessionId                      // sent with every request
//! ├── state: Mutex<SessionState>
//! │   ├── conversation: Conversation     // append-only turns
//! │   └── busy: bool                     // request outstanding
//! └── observers: Mutex<Vec<Sender>>      // ChatEvent subscribers
//! ```
//!
//! Only the turn controller mutates the session (the mutators are
//! `pub(crate)`). Everyone else reads snapshots or subscribes to
//! [`ChatEvent`] notifications.

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::debug;
use serde::Serialize;

use crate::core::conversation::{Conversation, Turn};

/// Opaque correlation token sent with every request of a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generates a fresh `session-<uuid>` identifier.
    pub fn generate() -> Self {
        Self(format!("session-{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    TurnAppended(Turn),
    BusyChanged(bool),
}

#[derive(Default)]
struct SessionState {
    conversation: Conversation,
    busy: bool,
}

pub struct Session {
    id: SessionId,
    state: Mutex<SessionState>,
    observers: Mutex<Vec<Sender<ChatEvent>>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_id(SessionId::generate())
    }

    pub fn with_id(id: SessionId) -> Self {
        debug!("Session created: {}", id);
        Self {
            id,
            state: Mutex::new(SessionState::default()),
            observers: Mutex::new(Vec::new()),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn is_busy(&self) -> bool {
        self.state().busy
    }

    /// Snapshot of the conversation so far.
    pub fn turns(&self) -> Vec<Turn> {
        self.state().conversation.all().to_vec()
    }

    /// Number of turns recorded so far.
    pub fn turn_count(&self) -> usize {
        self.state().conversation.len()
    }

    /// Registers a new observer. Events are delivered in the order they happen.
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> Receiver<ChatEvent> {
        let (tx, rx) = mpsc::channel();
        self.observers().push(tx);
        rx
    }

    /// Marks the session busy and records the user's turn, in one step.
    /// Returns `false` (and changes nothing) if a request is already outstanding.
    pub(crate) fn begin_turn(&self, user_turn: Turn) -> bool {
        {
            let mut state = self.state();
            if state.busy {
                return false;
            }
            state.busy = true;
            state.conversation.append(user_turn.clone());
        }
        self.notify(ChatEvent::BusyChanged(true));
        self.notify(ChatEvent::TurnAppended(user_turn));
        true
    }

    pub(crate) fn append(&self, turn: Turn) {
        self.state().conversation.append(turn.clone());
        self.notify(ChatEvent::TurnAppended(turn));
    }

    pub(crate) fn finish_turn(&self) {
        self.state().busy = false;
        self.notify(ChatEvent::BusyChanged(false));
    }

    fn notify(&self, event: ChatEvent) {
        self.observers()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    // A panic elsewhere must not wedge the session, so poisoning is ignored.
    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn observers(&self) -> MutexGuard<'_, Vec<Sender<ChatEvent>>> {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversation::Role;

    #[test]
    fn test_generated_ids_are_prefixed_and_distinct() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert!(a.as_str().starts_with("session-"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_new_session_is_idle_and_empty() {
        let session = Session::new();
        assert!(!session.is_busy());
        assert!(session.turns().is_empty());
        assert_eq!(session.turn_count(), 0);
    }

    #[test]
    fn test_begin_turn_sets_busy_and_appends() {
        let session = Session::with_id(SessionId::from("session-test"));
        assert!(session.begin_turn(Turn::user("hello")));
        assert!(session.is_busy());

        let turns = session.turns();
        assert_eq!(turns.len(), 1);
        assert_eq!(session.turn_count(), 1);
        assert_eq!(turns[0].role(), Role::User);
        assert_eq!(turns[0].content(), "hello");
    }

    #[test]
    fn test_begin_turn_rejected_while_busy() {
        let session = Session::new();
        assert!(session.begin_turn(Turn::user("one")));
        assert!(!session.begin_turn(Turn::user("two")));
        assert_eq!(session.turns().len(), 1);

        session.finish_turn();
        assert!(!session.is_busy());
        assert!(session.begin_turn(Turn::user("three")));
    }

    #[test]
    fn test_subscribers_receive_events_in_order() {
        let session = Session::new();
        let rx = session.subscribe();

        session.begin_turn(Turn::user("q"));
        session.append(Turn::assistant("a"));
        session.finish_turn();

        let events: Vec<ChatEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], ChatEvent::BusyChanged(true));
        assert!(matches!(&events[1], ChatEvent::TurnAppended(t) if t.content() == "q"));
        assert!(matches!(&events[2], ChatEvent::TurnAppended(t) if t.content() == "a"));
        assert_eq!(events[3], ChatEvent::BusyChanged(false));
    }

    #[test]
    fn test_rejected_turn_emits_nothing() {
        let session = Session::new();
        session.begin_turn(Turn::user("one"));
        let rx = session.subscribe();
        assert!(!session.begin_turn(Turn::user("two")));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let session = Session::new();
        let kept = session.subscribe();
        drop(session.subscribe());

        session.append(Turn::assistant("hi"));
        assert_eq!(session.observers().len(), 1);
        assert!(kept.try_recv().is_ok());
    }
}
