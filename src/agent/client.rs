//! HTTP client for the remote agent endpoint.
//!
//! One turn is one `POST` with `{"prompt", "sessionId"}`; the reply is a
//! single JSON object. No streaming, no retries, no explicit timeout.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Url;

use super::types::{AgentReply, AgentRequest};
use super::AgentError;
use crate::core::session::SessionId;

#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Short description of where prompts go, shown in the title bar.
    fn label(&self) -> &str;

    /// Sends one prompt and waits for the complete reply text.
    async fn ask(&self, prompt: &str, session_id: &SessionId) -> Result<String, AgentError>;
}

/// Agent reached over plain HTTP(S) at a fixed endpoint URL.
pub struct HttpAgentClient {
    endpoint: Url,
    label: String,
    client: reqwest::Client,
}

impl HttpAgentClient {
    pub fn new(endpoint: Url) -> Self {
        let label = endpoint
            .host_str()
            .map(|host| match endpoint.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            })
            .unwrap_or_else(|| endpoint.to_string());

        Self {
            endpoint,
            label,
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl AgentClient for HttpAgentClient {
    fn label(&self) -> &str {
        &self.label
    }

    async fn ask(&self, prompt: &str, session_id: &SessionId) -> Result<String, AgentError> {
        let request = AgentRequest {
            prompt,
            session_id: session_id.as_str(),
        };

        info!(
            "Agent request: endpoint={}, session={}, prompt_len={}",
            self.endpoint,
            session_id,
            prompt.len()
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::Transport(e.to_string()))?;

        let status = response.status();
        debug!("Agent response status: {}", status);

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Agent HTTP error: {} - {}", status.as_u16(), body);
            return Err(AgentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AgentError::Transport(e.to_string()))?;
        debug!("Agent response body: {} bytes", body.len());

        let reply: AgentReply = serde_json::from_str(&body).map_err(|e| {
            warn!("Agent response is not the expected JSON object: {}", e);
            AgentError::Malformed(e.to_string())
        })?;

        reply.into_text()
    }
}
