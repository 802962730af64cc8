use std::fmt::Debug;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::{PlayerContext, StartGameParams};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("agent at {url} responded with status {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("agent response is not valid JSON: {0}")]
    Decode(String),

    #[error("agent has no response for {0}")]
    NoResponse(String),
}

/// Each method maps to one agent endpoint. Responses come back as raw JSON;
/// validating their shape is up to the caller.
#[async_trait]
pub trait Agent: Debug + Send + Sync {
    async fn start_game(&self, params: &StartGameParams) -> Result<(), AgentError>;
    async fn speak(&self, context: &PlayerContext) -> Result<Value, AgentError>;
    async fn vote(&self, context: &PlayerContext) -> Result<Value, AgentError>;
    async fn use_ability(&self, context: &PlayerContext) -> Result<Value, AgentError>;
}
