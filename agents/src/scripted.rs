use std::collections::VecDeque;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use types::{Agent, AgentError, PlayerContext, PlayerId, StartGameParams};

#[derive(Clone, Debug, PartialEq)]
pub enum AgentCall {
    StartGame(StartGameParams),
    Speak(PlayerContext),
    Vote(PlayerContext),
    UseAbility(PlayerContext),
}

#[derive(Debug, Default)]
struct Script {
    start_failure: Option<AgentError>,
    speeches: VecDeque<Result<Value, AgentError>>,
    votes: VecDeque<Result<Value, AgentError>>,
    abilities: VecDeque<Result<Value, AgentError>>,
    calls: Vec<AgentCall>,
}

// An empty queue answers with AgentError::NoResponse, which callers
// treat like any other failed request.
#[derive(Debug, Default)]
pub struct ScriptedAgent {
    script: Mutex<Script>,
}

impl ScriptedAgent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_speech(self, speech: &str) -> Self {
        self.with_raw_speech(Ok(json!({ "speech": speech })))
    }

    pub fn with_vote(self, target: PlayerId, reason: &str) -> Self {
        self.with_raw_vote(Ok(json!({ "target": target, "reason": reason })))
    }

    pub fn with_ability(self, response: Value) -> Self {
        self.with_raw_ability(Ok(response))
    }

    pub fn with_raw_speech(mut self, response: Result<Value, AgentError>) -> Self {
        self.script.get_mut().speeches.push_back(response);
        self
    }

    pub fn with_raw_vote(mut self, response: Result<Value, AgentError>) -> Self {
        self.script.get_mut().votes.push_back(response);
        self
    }

    pub fn with_raw_ability(mut self, response: Result<Value, AgentError>) -> Self {
        self.script.get_mut().abilities.push_back(response);
        self
    }

    pub fn with_start_failure(mut self, err: AgentError) -> Self {
        self.script.get_mut().start_failure = Some(err);
        self
    }

    pub async fn calls(&self) -> Vec<AgentCall> {
        self.script.lock().await.calls.clone()
    }
}

fn next(queue: &mut VecDeque<Result<Value, AgentError>>, what: &str) -> Result<Value, AgentError> {
    queue
        .pop_front()
        .unwrap_or_else(|| Err(AgentError::NoResponse(what.to_string())))
}

#[async_trait]
impl Agent for ScriptedAgent {
    async fn start_game(&self, params: &StartGameParams) -> Result<(), AgentError> {
        let mut script = self.script.lock().await;
        script.calls.push(AgentCall::StartGame(params.clone()));
        match script.start_failure.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn speak(&self, context: &PlayerContext) -> Result<Value, AgentError> {
        let mut script = self.script.lock().await;
        script.calls.push(AgentCall::Speak(context.clone()));
        next(&mut script.speeches, "speak")
    }

    async fn vote(&self, context: &PlayerContext) -> Result<Value, AgentError> {
        let mut script = self.script.lock().await;
        script.calls.push(AgentCall::Vote(context.clone()));
        next(&mut script.votes, "vote")
    }

    async fn use_ability(&self, context: &PlayerContext) -> Result<Value, AgentError> {
        let mut script = self.script.lock().await;
        script.calls.push(AgentCall::UseAbility(context.clone()));
        next(&mut script.abilities, "use-ability")
    }
}
