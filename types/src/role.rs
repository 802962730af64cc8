use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_PLAYERS: usize = 6;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Villager,
    Werewolf,
    Seer,
    Witch,
}

impl Role {
    pub fn is_werewolf(self) -> bool {
        self == Role::Werewolf
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Villager => write!(f, "Villager"),
            Role::Werewolf => write!(f, "Werewolf"),
            Role::Seer => write!(f, "Seer"),
            Role::Witch => write!(f, "Witch"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConfig {
    pub role: Role,
    pub count: usize,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleConfigError {
    #[error("at least {MIN_PLAYERS} players are required, got {0}")]
    TooFewPlayers(usize),
}

/// Six and eight player tables use fixed compositions. Every other size gets
/// `player_count / 3` werewolves, one seer, a witch from eight players up, and
/// villagers for the remaining seats.
pub fn default_role_config(player_count: usize) -> Result<Vec<RoleConfig>, RoleConfigError> {
    if player_count < MIN_PLAYERS {
        return Err(RoleConfigError::TooFewPlayers(player_count));
    }

    let fixed = |villagers: usize| {
        vec![
            RoleConfig { role: Role::Werewolf, count: 2 },
            RoleConfig { role: Role::Seer, count: 1 },
            RoleConfig { role: Role::Witch, count: 1 },
            RoleConfig { role: Role::Villager, count: villagers },
        ]
    };
    match player_count {
        6 => return Ok(fixed(2)),
        8 => return Ok(fixed(4)),
        _ => {}
    }

    let werewolves = player_count / 3;
    let mut configs = vec![
        RoleConfig { role: Role::Werewolf, count: werewolves },
        RoleConfig { role: Role::Seer, count: 1 },
    ];
    if player_count >= 8 {
        configs.push(RoleConfig { role: Role::Witch, count: 1 });
    }
    let specials: usize = configs
        .iter()
        .filter(|config| !config.role.is_werewolf())
        .map(|config| config.count)
        .sum();
    configs.push(RoleConfig {
        role: Role::Villager,
        count: player_count - werewolves - specials,
    });
    Ok(configs)
}

pub fn expand_roles(configs: &[RoleConfig]) -> Vec<Role> {
    configs
        .iter()
        .flat_map(|config| std::iter::repeat(config.role).take(config.count))
        .collect()
}
