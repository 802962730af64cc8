use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AllSpeeches, AllVotes, GamePhase, PlayerId, Role, Round};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub is_alive: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeerResult {
    pub target: PlayerId,
    pub is_good: bool,
}

pub type InvestigatedPlayers = BTreeMap<Round, SeerResult>;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotionUsage {
    pub heal: bool,
    pub poison: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RoleContext {
    Witch {
        /// Tonight's werewolf victim, 0 when there is none.
        #[serde(rename = "killedTonight")]
        killed_tonight: PlayerId,
        #[serde(rename = "potionUsed")]
        potion_used: PotionUsage,
    },
    Seer {
        #[serde(rename = "investigatedPlayers")]
        investigated_players: InvestigatedPlayers,
    },
    Plain {},
}

/// Body sent with every speak, vote and use-ability request.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerContext {
    pub round: Round,
    pub current_phase: GamePhase,
    pub alive_players: Vec<PlayerInfo>,
    pub all_speeches: AllSpeeches,
    pub all_votes: AllVotes,
    #[serde(flatten)]
    pub role: RoleContext,
}

impl PlayerContext {
    pub fn is_alive(&self, id: PlayerId) -> bool {
        self.alive_players.iter().any(|p| p.id == id && p.is_alive)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGameParams {
    pub game_id: Uuid,
    pub role: Role,
    pub player_id: PlayerId,
    pub teammates: Vec<PlayerId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base(role: RoleContext) -> PlayerContext {
        PlayerContext {
            round: 2,
            current_phase: GamePhase::Night,
            alive_players: vec![PlayerInfo { id: 1, is_alive: true }],
            all_speeches: AllSpeeches::new(),
            all_votes: AllVotes::new(),
            role,
        }
    }

    #[test]
    fn test_plain_context_has_only_shared_fields() {
        let value = serde_json::to_value(base(RoleContext::Plain {})).unwrap();
        assert_eq!(
            value,
            json!({
                "round": 2,
                "currentPhase": "night",
                "alivePlayers": [{"id": 1, "isAlive": true}],
                "allSpeeches": {},
                "allVotes": {},
            })
        );
    }

    #[test]
    fn test_witch_context_is_flattened() {
        let value = serde_json::to_value(base(RoleContext::Witch {
            killed_tonight: 4,
            potion_used: PotionUsage { heal: true, poison: false },
        }))
        .unwrap();
        assert_eq!(value["killedTonight"], json!(4));
        assert_eq!(value["potionUsed"], json!({"heal": true, "poison": false}));
        assert_eq!(value["round"], json!(2));
    }

    #[test]
    fn test_seer_context_keys_results_by_round() {
        let mut investigated = InvestigatedPlayers::new();
        investigated.insert(1, SeerResult { target: 5, is_good: false });
        let value = serde_json::to_value(base(RoleContext::Seer {
            investigated_players: investigated,
        }))
        .unwrap();
        assert_eq!(
            value["investigatedPlayers"],
            json!({"1": {"target": 5, "isGood": false}})
        );
    }
}
