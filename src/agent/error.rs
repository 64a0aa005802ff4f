use std::fmt;

/// Everything that can go wrong while asking the remote agent.
///
/// Each variant renders to a single human-readable line; the turn
/// controller shows that line to the user as `Error: <message>`.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentError {
    /// The request never produced a response (connection refused, DNS, timeout).
    Transport(String),
    /// The agent answered with a non-2xx status. `body` is kept for the log only.
    Status { status: u16, body: String },
    /// The payload was well-formed but carried an `error` field.
    Application(String),
    /// The body could not be parsed into the expected JSON object.
    Malformed(String),
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentError::Transport(msg) => write!(f, "could not reach the agent: {msg}"),
            AgentError::Status { status, .. } => write!(f, "agent returned HTTP status {status}"),
            AgentError::Application(msg) => write!(f, "{msg}"),
            AgentError::Malformed(msg) => write!(f, "malformed agent response: {msg}"),
        }
    }
}

impl std::error::Error for AgentError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_includes_code() {
        let err = AgentError::Status {
            status: 503,
            body: "upstream down".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("503"));
        assert!(!text.contains("upstream down"));
    }

    #[test]
    fn application_message_is_verbatim() {
        let err = AgentError::Application("quota exceeded".to_string());
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn transport_and_malformed_are_prefixed() {
        assert!(AgentError::Transport("refused".into())
            .to_string()
            .starts_with("could not reach the agent"));
        assert!(AgentError::Malformed("eof".into())
            .to_string()
            .starts_with("malformed agent response"));
    }
}
