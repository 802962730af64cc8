pub mod config;
pub mod http_client;
pub mod random_agent;
pub mod retry;
pub mod scripted;

pub use config::AgentClientConfig;
pub use http_client::{Endpoint, HttpAgent};
pub use random_agent::RandomAgent;
pub use retry::{classify, retry_with_backoff, Backoff, RetryClass};
pub use scripted::{AgentCall, ScriptedAgent};
