use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::thread_rng;
use serde_json::Value;
use tokio::sync::Mutex;
use types::{
    Agent, AgentError, PlayerContext, PlayerId, Role, RoleContext, SeerAbility, SeerAction,
    SpeechResponse, StartGameParams, VoteResponse, WerewolfAbility, WerewolfAction, WitchAbility,
    WitchAction,
};

const OPENERS: [&str; 4] = [
    "I have a bad feeling about player {}.",
    "Player {} has been suspiciously quiet.",
    "I think player {} is on our side.",
    "Let's keep an eye on player {} today.",
];

#[derive(Debug, Default)]
pub struct RandomAgent {
    seat: Mutex<Option<StartGameParams>>,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self::default()
    }

    async fn seat(&self) -> Result<StartGameParams, AgentError> {
        self.seat
            .lock()
            .await
            .clone()
            .ok_or_else(|| AgentError::NoResponse("no seat assigned yet".to_string()))
    }
}

fn living_except(context: &PlayerContext, excluded: &[PlayerId]) -> Vec<PlayerId> {
    context
        .alive_players
        .iter()
        .filter(|p| p.is_alive && !excluded.contains(&p.id))
        .map(|p| p.id)
        .collect()
}

fn pick(candidates: &[PlayerId]) -> Option<PlayerId> {
    candidates.choose(&mut thread_rng()).copied()
}

fn to_value<T: serde::Serialize>(response: &T) -> Result<Value, AgentError> {
    serde_json::to_value(response).map_err(|e| AgentError::Decode(e.to_string()))
}

// Werewolves keep away from their own pack when there is anyone else left.
fn hostile_targets(seat: &StartGameParams, context: &PlayerContext) -> Vec<PlayerId> {
    let mut excluded = seat.teammates.clone();
    excluded.push(seat.player_id);
    let outsiders = living_except(context, &excluded);
    if outsiders.is_empty() {
        living_except(context, &[seat.player_id])
    } else {
        outsiders
    }
}

fn werewolf_ability(seat: &StartGameParams, context: &PlayerContext) -> WerewolfAbility {
    match pick(&hostile_targets(seat, context)) {
        Some(target) => WerewolfAbility {
            action: WerewolfAction::Kill,
            target,
            reason: "the pack is hungry".to_string(),
        },
        None => WerewolfAbility {
            action: WerewolfAction::Idle,
            target: 0,
            reason: "nobody left to hunt".to_string(),
        },
    }
}

fn seer_ability(seat: &StartGameParams, context: &PlayerContext) -> Option<SeerAbility> {
    let mut excluded = vec![seat.player_id];
    if let RoleContext::Seer {
        investigated_players,
    } = &context.role
    {
        excluded.extend(investigated_players.values().map(|result| result.target));
    }
    let target = pick(&living_except(context, &excluded))
        .or_else(|| pick(&living_except(context, &[seat.player_id])))?;
    Some(SeerAbility {
        action: SeerAction::Investigate,
        target,
        reason: "a hunch".to_string(),
    })
}

fn witch_ability(context: &PlayerContext) -> WitchAbility {
    match &context.role {
        RoleContext::Witch {
            killed_tonight,
            potion_used,
        } if *killed_tonight > 0 && !potion_used.heal => WitchAbility {
            action: WitchAction::Using,
            heal_target: *killed_tonight,
            heal_reason: "nobody dies on my watch".to_string(),
            poison_target: 0,
            poison_reason: String::new(),
        },
        _ => WitchAbility::idle("saving my potions"),
    }
}

#[async_trait]
impl Agent for RandomAgent {
    async fn start_game(&self, params: &StartGameParams) -> Result<(), AgentError> {
        tracing::debug!(
            "Random agent {} seated as {}",
            params.player_id,
            params.role
        );
        *self.seat.lock().await = Some(params.clone());
        Ok(())
    }

    async fn speak(&self, context: &PlayerContext) -> Result<Value, AgentError> {
        let seat = self.seat().await?;
        let speech = match pick(&living_except(context, &[seat.player_id])) {
            Some(suspect) => {
                let opener = OPENERS.choose(&mut thread_rng()).copied().unwrap_or(OPENERS[0]);
                opener.replace("{}", &suspect.to_string())
            }
            None => "Nothing to add.".to_string(),
        };
        to_value(&SpeechResponse { speech })
    }

    async fn vote(&self, context: &PlayerContext) -> Result<Value, AgentError> {
        let seat = self.seat().await?;
        let candidates = match seat.role {
            Role::Werewolf => hostile_targets(&seat, context),
            _ => living_except(context, &[seat.player_id]),
        };
        let target = pick(&candidates)
            .ok_or_else(|| AgentError::NoResponse("vote: nobody to vote for".to_string()))?;
        to_value(&VoteResponse {
            target,
            reason: "gut feeling".to_string(),
        })
    }

    async fn use_ability(&self, context: &PlayerContext) -> Result<Value, AgentError> {
        let seat = self.seat().await?;
        match seat.role {
            Role::Werewolf => to_value(&werewolf_ability(&seat, context)),
            Role::Seer => seer_ability(&seat, context)
                .ok_or_else(|| AgentError::NoResponse("investigate: nobody left".to_string()))
                .and_then(|ability| to_value(&ability)),
            Role::Witch => to_value(&witch_ability(context)),
            Role::Villager => Ok(Value::Null),
        }
    }
}
