use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::retry::Backoff;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentClientConfig {
    // Upper bound on one request. Agents may be waiting on a slow model.
    pub timeout_secs: u64,
    pub max_attempts: usize,
    /// Start-game notifications happen during setup and should fail fast.
    pub start_game_attempts: usize,
    pub initial_backoff_ms: u64,
    pub backoff_multiplier: u32,
    pub max_backoff_ms: u64,
}

impl Default for AgentClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 45,
            max_attempts: 3,
            start_game_attempts: 1,
            initial_backoff_ms: 1000,
            backoff_multiplier: 2,
            max_backoff_ms: 10_000,
        }
    }
}

impl AgentClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backoff(&self) -> Backoff {
        self.backoff_with_attempts(self.max_attempts)
    }

    pub fn start_game_backoff(&self) -> Backoff {
        self.backoff_with_attempts(self.start_game_attempts)
    }

    fn backoff_with_attempts(&self, max_attempts: usize) -> Backoff {
        Backoff {
            max_attempts,
            initial_delay: Duration::from_millis(self.initial_backoff_ms),
            multiplier: self.backoff_multiplier,
            max_delay: Duration::from_millis(self.max_backoff_ms),
        }
    }
}
