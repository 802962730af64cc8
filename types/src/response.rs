use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::PlayerId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechResponse {
    pub speech: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResponse {
    pub target: PlayerId,
    pub reason: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WerewolfAction {
    Kill,
    Idle,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WerewolfAbility {
    pub action: WerewolfAction,
    pub target: PlayerId,
    pub reason: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeerAction {
    Investigate,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeerAbility {
    pub action: SeerAction,
    pub target: PlayerId,
    pub reason: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WitchAction {
    Using,
    Idle,
}

/// A target of 0 means that potion is not used.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WitchAbility {
    pub action: WitchAction,
    pub heal_target: PlayerId,
    pub heal_reason: String,
    pub poison_target: PlayerId,
    pub poison_reason: String,
}

impl WitchAbility {
    pub fn idle(reason: impl Into<String>) -> Self {
        Self {
            action: WitchAction::Idle,
            heal_target: 0,
            heal_reason: reason.into(),
            poison_target: 0,
            poison_reason: String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbilityResult {
    Werewolf(WerewolfAbility),
    Seer(SeerAbility),
    Witch(WitchAbility),
}

impl Display for AbilityResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbilityResult::Werewolf(ability) => match ability.action {
                WerewolfAction::Kill => write!(f, "kill {}: {}", ability.target, ability.reason),
                WerewolfAction::Idle => write!(f, "idle: {}", ability.reason),
            },
            AbilityResult::Seer(ability) => {
                write!(f, "investigate {}: {}", ability.target, ability.reason)
            }
            AbilityResult::Witch(ability) => match ability.action {
                WitchAction::Idle => write!(f, "no potion: {}", ability.heal_reason),
                WitchAction::Using => write!(
                    f,
                    "heal {} ({}), poison {} ({})",
                    ability.heal_target,
                    ability.heal_reason,
                    ability.poison_target,
                    ability.poison_reason
                ),
            },
        }
    }
}
