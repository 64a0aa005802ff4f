//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::agent::{AgentClient, AgentError};
use crate::core::controller::TurnController;
use crate::core::session::{Session, SessionId};

/// An agent that plays back canned results and records what it was asked.
pub struct ScriptedAgent {
    script: Mutex<VecDeque<Result<String, AgentError>>>,
    /// Returned once the script runs out.
    fallback: Result<String, AgentError>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedAgent {
    pub fn replying(text: &str) -> Arc<Self> {
        Self::build(VecDeque::new(), Ok(text.to_string()))
    }

    pub fn failing(error: AgentError) -> Arc<Self> {
        Self::build(VecDeque::new(), Err(error))
    }

    pub fn sequence(results: Vec<Result<String, AgentError>>) -> Arc<Self> {
        Self::build(results.into(), Ok("script exhausted".to_string()))
    }

    fn build(
        script: VecDeque<Result<String, AgentError>>,
        fallback: Result<String, AgentError>,
    ) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script),
            fallback,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }

    pub fn session_ids(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(_, s)| s.clone()).collect()
    }
}

#[async_trait]
impl AgentClient for ScriptedAgent {
    fn label(&self) -> &str {
        "scripted"
    }

    async fn ask(&self, prompt: &str, session_id: &SessionId) -> Result<String, AgentError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), session_id.to_string()));
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

/// An agent that holds every request until [`GatedAgent::release`] is called.
pub struct GatedAgent {
    reply: String,
    gate: Notify,
}

impl GatedAgent {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            gate: Notify::new(),
        })
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl AgentClient for GatedAgent {
    fn label(&self) -> &str {
        "gated"
    }

    async fn ask(&self, _prompt: &str, _session_id: &SessionId) -> Result<String, AgentError> {
        self.gate.notified().await;
        Ok(self.reply.clone())
    }
}

/// Creates a controller over a fresh session.
pub fn test_controller(agent: Arc<dyn AgentClient>) -> TurnController {
    TurnController::new(Arc::new(Session::new()), agent)
}
