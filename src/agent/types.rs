use serde::{Deserialize, Serialize};

use super::AgentError;

/// Shown in place of the reply when the agent answers without a `response` field.
pub const NO_RESPONSE_FALLBACK: &str = "No response was received from the agent.";

/// The request body posted to the agent endpoint.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AgentRequest<'a> {
    pub prompt: &'a str,
    #[serde(rename = "sessionId")]
    pub session_id: &'a str,
}

/// The response body returned by the agent endpoint.
///
/// Only `response` and `error` are read; any other field is ignored.
#[derive(Deserialize, Debug, Default)]
pub struct AgentReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl AgentReply {
    /// Collapses the payload into the reply text or an application error.
    ///
    /// A truthy `error` wins over `response`. A missing or empty
    /// `response` yields [`NO_RESPONSE_FALLBACK`].
    pub fn into_text(self) -> Result<String, AgentError> {
        if let Some(message) = self.error.and_then(error_message) {
            return Err(AgentError::Application(message));
        }

        Ok(self
            .response
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| NO_RESPONSE_FALLBACK.to_string()))
    }
}

/// Falsy values (`null`, `false`, `0`, `""`) mean "no error"; strings are used
/// verbatim, anything else as JSON text.
fn error_message(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null | serde_json::Value::Bool(false) => None,
        serde_json::Value::Number(n) if n.as_f64() == Some(0.0) => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
