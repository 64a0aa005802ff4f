//! # Turn Controller
//!
//! Runs one request/response cycle per submission:
//!
//! ```text
//! submit(text)
//!   ├── trim, reject empty            → Ignored(Empty)
//!   ├── begin_turn (busy + user turn)  → Ignored(Busy) if already busy
//!   ├── agent.ask(prompt, session id)
//!   ├── append assistant turn (reply or "Error: ...")
//!   └── BusyGuard dropped              → busy cleared
//! ```
//!
//! The busy flag is released by `BusyGuard::drop`, so it cannot stay set
//! after a failure, a panic, or the submit future being dropped mid-flight.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::agent::{AgentClient, AgentError};
use crate::core::conversation::{Turn, normalize_line_breaks};
use crate::core::session::Session;

/// Why a submission was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Nothing left after trimming whitespace.
    Empty,
    /// A previous request is still outstanding.
    Busy,
}

/// What happened to a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Ignored(IgnoreReason),
    Replied,
    /// The agent call failed; the error was also recorded as an assistant turn.
    Failed(AgentError),
}

#[derive(Clone)]
pub struct TurnController {
    session: Arc<Session>,
    agent: Arc<dyn AgentClient>,
}

impl TurnController {
    pub fn new(session: Arc<Session>, agent: Arc<dyn AgentClient>) -> Self {
        Self { session, agent }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Sends `text` to the agent and records both sides of the exchange.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let prompt = text.trim();
        if prompt.is_empty() {
            debug!("Ignoring empty submission");
            return SubmitOutcome::Ignored(IgnoreReason::Empty);
        }

        let Some(_busy) = BusyGuard::acquire(&self.session, Turn::user(prompt)) else {
            debug!("Ignoring submission while a request is outstanding");
            return SubmitOutcome::Ignored(IgnoreReason::Busy);
        };

        info!(
            "Submitting turn {} to {} (len={})",
            self.session.turn_count(),
            self.agent.label(),
            prompt.len()
        );

        match self.agent.ask(prompt, self.session.id()).await {
            Ok(reply) => {
                info!("Agent replied ({} bytes)", reply.len());
                self.session
                    .append(Turn::assistant(normalize_line_breaks(&reply)));
                SubmitOutcome::Replied
            }
            Err(e) => {
                warn!("Agent call failed: {}", e);
                self.session.append(Turn::assistant(format!("Error: {e}")));
                SubmitOutcome::Failed(e)
            }
        }
    }
}

/// Holds the session's busy flag for the duration of one request.
struct BusyGuard<'a> {
    session: &'a Session,
}

impl<'a> BusyGuard<'a> {
    fn acquire(session: &'a Session, user_turn: Turn) -> Option<Self> {
        session
            .begin_turn(user_turn)
            .then_some(Self { session })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.session.finish_turn();
    }
}
