pub mod agent;
pub mod context;
pub mod phase;
pub mod response;
pub mod role;
pub mod speech;
pub mod vote;

pub type PlayerId = i32;
pub type Round = u32;

pub use agent::{Agent, AgentError};
pub use context::{
    InvestigatedPlayers, PlayerContext, PlayerInfo, PotionUsage, RoleContext, SeerResult,
    StartGameParams,
};
pub use phase::{evaluate_win, GamePhase, WinCondition};
pub use response::{
    AbilityResult, SeerAbility, SeerAction, SpeechResponse, VoteResponse, WerewolfAbility,
    WerewolfAction, WitchAbility, WitchAction,
};
pub use role::{default_role_config, expand_roles, Role, RoleConfig, RoleConfigError, MIN_PLAYERS};
pub use speech::{AllSpeeches, Speech, SpeechKind, SYSTEM_SPEAKER};
pub use vote::{count_votes, determine_elimination, AllVotes, Vote};
