use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Preparing,
    Night,
    Day,
    Voting,
    Ended,
}

impl GamePhase {
    pub fn next_in_cycle(self) -> Option<GamePhase> {
        match self {
            GamePhase::Night => Some(GamePhase::Day),
            GamePhase::Day => Some(GamePhase::Voting),
            GamePhase::Voting => Some(GamePhase::Night),
            GamePhase::Preparing | GamePhase::Ended => None,
        }
    }
}

impl Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GamePhase::Preparing => write!(f, "Preparing"),
            GamePhase::Night => write!(f, "Night"),
            GamePhase::Day => write!(f, "Day"),
            GamePhase::Voting => write!(f, "Voting"),
            GamePhase::Ended => write!(f, "Ended"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinCondition {
    Ongoing,
    WerewolvesWin,
    VillagersWin,
}

impl Display for WinCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WinCondition::Ongoing => write!(f, "Ongoing"),
            WinCondition::WerewolvesWin => write!(f, "Werewolves win"),
            WinCondition::VillagersWin => write!(f, "Villagers win"),
        }
    }
}

/// Same rule for every table size: no werewolves left means the village wins,
/// werewolves matching or outnumbering everyone else means they win.
pub fn evaluate_win(alive_werewolves: usize, alive_good: usize) -> WinCondition {
    if alive_werewolves == 0 {
        WinCondition::VillagersWin
    } else if alive_werewolves >= alive_good {
        WinCondition::WerewolvesWin
    } else {
        WinCondition::Ongoing
    }
}
