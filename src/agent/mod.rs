pub mod client;
pub mod error;
pub mod types;

pub use client::{AgentClient, HttpAgentClient};
pub use error::AgentError;
pub use types::{AgentReply, AgentRequest, NO_RESPONSE_FALLBACK};
