use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use types::{Agent, AgentError, PlayerContext, PlayerId, StartGameParams};

use crate::config::AgentClientConfig;
use crate::retry::{retry_with_backoff, Backoff};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    StartGame,
    Speak,
    Vote,
    UseAbility,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::StartGame => "start-game",
            Endpoint::Speak => "speak",
            Endpoint::Vote => "vote",
            Endpoint::UseAbility => "use-ability",
        }
    }
}

#[derive(Clone, Debug)]
pub struct HttpAgent {
    player_id: PlayerId,
    base_url: String,
    client: reqwest::Client,
    config: AgentClientConfig,
}

impl HttpAgent {
    pub fn new(
        player_id: PlayerId,
        base_url: impl Into<String>,
        config: AgentClientConfig,
    ) -> Result<Self, AgentError> {
        let base_url = base_url.into();
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AgentError::Transport {
                url: base_url.clone(),
                message: e.to_string(),
            })?;
        Ok(Self {
            player_id,
            base_url,
            client,
            config,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, endpoint: Endpoint) -> String {
        format!(
            "{}/api/player/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.path()
        )
    }

    async fn call<B>(
        &self,
        endpoint: Endpoint,
        body: &B,
        backoff: Backoff,
    ) -> Result<Value, AgentError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = self.endpoint(endpoint);
        let url = url.as_str();
        tracing::debug!("Calling player {} at {url}", self.player_id);
        let result = retry_with_backoff(move || self.post_once(url, body), backoff).await;
        if let Err(err) = &result {
            tracing::warn!("Player {} {} call failed: {err}", self.player_id, endpoint.path());
        }
        result
    }

    async fn post_once<B>(&self, url: &str, body: &B) -> Result<Value, AgentError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| transport_error(url, e))?;

        if !status.is_success() {
            return Err(AgentError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| AgentError::Decode(e.to_string()))
    }
}

fn transport_error(url: &str, err: reqwest::Error) -> AgentError {
    if err.is_timeout() {
        AgentError::Timeout {
            url: url.to_string(),
        }
    } else {
        AgentError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl Agent for HttpAgent {
    async fn start_game(&self, params: &StartGameParams) -> Result<(), AgentError> {
        self.call(Endpoint::StartGame, params, self.config.start_game_backoff())
            .await
            .map(|_| ())
    }

    async fn speak(&self, context: &PlayerContext) -> Result<Value, AgentError> {
        self.call(Endpoint::Speak, context, self.config.backoff()).await
    }

    async fn vote(&self, context: &PlayerContext) -> Result<Value, AgentError> {
        self.call(Endpoint::Vote, context, self.config.backoff()).await
    }

    async fn use_ability(&self, context: &PlayerContext) -> Result<Value, AgentError> {
        self.call(Endpoint::UseAbility, context, self.config.backoff())
            .await
    }
}
