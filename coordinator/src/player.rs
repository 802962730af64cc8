use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use types::{
    AbilityResult, Agent, AgentError, AllSpeeches, AllVotes, GamePhase, InvestigatedPlayers,
    PlayerContext, PlayerId, PlayerInfo, PotionUsage, Role, RoleContext, Round, SeerAbility,
    SeerResult, SpeechResponse, StartGameParams, VoteResponse, WerewolfAbility, WitchAbility,
};
use uuid::Uuid;

use crate::night::NightTemp;

#[derive(Error, Debug)]
pub enum ActionError {
    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("Response has the wrong shape: {0}")]
    Schema(#[from] serde_json::Error),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Investigation {
    pub seer: PlayerId,
    pub result: SeerResult,
}

#[derive(Copy, Clone, Debug)]
pub struct GameView<'a> {
    pub round: Round,
    pub phase: GamePhase,
    pub players: &'a [Player],
    pub speeches: &'a AllSpeeches,
    pub votes: &'a AllVotes,
    pub night: &'a NightTemp,
    pub investigations: &'a BTreeMap<Round, Investigation>,
}

/// Which of the witch's two potions are gone. 0 means unused.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WitchPotions {
    pub heal_used_on: PlayerId,
    pub poison_used_on: PlayerId,
}

impl WitchPotions {
    pub fn has_heal(&self) -> bool {
        self.heal_used_on == 0
    }

    pub fn has_poison(&self) -> bool {
        self.poison_used_on == 0
    }

    pub fn use_heal(&mut self, target: PlayerId) -> bool {
        if !self.has_heal() {
            return false;
        }
        self.heal_used_on = target;
        true
    }

    pub fn use_poison(&mut self, target: PlayerId) -> bool {
        if !self.has_poison() {
            return false;
        }
        self.poison_used_on = target;
        true
    }

    pub fn usage(&self) -> PotionUsage {
        PotionUsage {
            heal: !self.has_heal(),
            poison: !self.has_poison(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RoleState {
    Villager,
    Werewolf,
    Seer,
    Witch(WitchPotions),
}

impl RoleState {
    pub fn new(role: Role) -> Self {
        match role {
            Role::Villager => RoleState::Villager,
            Role::Werewolf => RoleState::Werewolf,
            Role::Seer => RoleState::Seer,
            Role::Witch => RoleState::Witch(WitchPotions::default()),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            RoleState::Villager => Role::Villager,
            RoleState::Werewolf => Role::Werewolf,
            RoleState::Seer => Role::Seer,
            RoleState::Witch(_) => Role::Witch,
        }
    }
}

type ContextFn = fn(&Player, &GameView<'_>) -> RoleContext;
type AbilityParser = fn(Value) -> Result<AbilityResult, serde_json::Error>;

/// What sets one role apart from another: the extra context it sees and how
/// its night ability answer is read. `ability` is `None` for roles that never
/// act at night.
struct RoleBehaviour {
    context: ContextFn,
    ability: Option<AbilityParser>,
}

const VILLAGER: RoleBehaviour = RoleBehaviour {
    context: plain_context,
    ability: None,
};

const WEREWOLF: RoleBehaviour = RoleBehaviour {
    context: plain_context,
    ability: Some(parse_werewolf),
};

const SEER: RoleBehaviour = RoleBehaviour {
    context: seer_context,
    ability: Some(parse_seer),
};

const WITCH: RoleBehaviour = RoleBehaviour {
    context: witch_context,
    ability: Some(parse_witch),
};

fn behaviour(role: Role) -> &'static RoleBehaviour {
    match role {
        Role::Villager => &VILLAGER,
        Role::Werewolf => &WEREWOLF,
        Role::Seer => &SEER,
        Role::Witch => &WITCH,
    }
}

fn plain_context(_player: &Player, _view: &GameView<'_>) -> RoleContext {
    RoleContext::Plain {}
}

fn seer_context(player: &Player, view: &GameView<'_>) -> RoleContext {
    let investigated_players: InvestigatedPlayers = view
        .investigations
        .iter()
        .filter(|(_, investigation)| investigation.seer == player.id)
        .map(|(round, investigation)| (*round, investigation.result))
        .collect();
    RoleContext::Seer {
        investigated_players,
    }
}

fn witch_context(player: &Player, view: &GameView<'_>) -> RoleContext {
    let potions = player.potions().unwrap_or_default();
    RoleContext::Witch {
        killed_tonight: view.night.werewolf_target.unwrap_or(0),
        potion_used: potions.usage(),
    }
}

fn parse_werewolf(value: Value) -> Result<AbilityResult, serde_json::Error> {
    serde_json::from_value::<WerewolfAbility>(value).map(AbilityResult::Werewolf)
}

fn parse_seer(value: Value) -> Result<AbilityResult, serde_json::Error> {
    serde_json::from_value::<SeerAbility>(value).map(AbilityResult::Seer)
}

fn parse_witch(value: Value) -> Result<AbilityResult, serde_json::Error> {
    serde_json::from_value::<WitchAbility>(value).map(AbilityResult::Witch)
}

#[derive(Clone, Debug)]
pub struct Player {
    id: PlayerId,
    game_id: Uuid,
    state: RoleState,
    is_alive: bool,
    agent: Arc<dyn Agent>,
}

impl Player {
    pub fn new(id: PlayerId, game_id: Uuid, role: Role, agent: Arc<dyn Agent>) -> Self {
        Self {
            id,
            game_id,
            state: RoleState::new(role),
            is_alive: true,
            agent,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.state.role()
    }

    pub fn state(&self) -> RoleState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.is_alive
    }

    pub fn has_ability(&self) -> bool {
        behaviour(self.role()).ability.is_some()
    }

    pub fn potions(&self) -> Option<WitchPotions> {
        match self.state {
            RoleState::Witch(potions) => Some(potions),
            _ => None,
        }
    }

    pub(crate) fn potions_mut(&mut self) -> Option<&mut WitchPotions> {
        match &mut self.state {
            RoleState::Witch(potions) => Some(potions),
            _ => None,
        }
    }

    // false if they were already dead
    pub(crate) fn kill(&mut self) -> bool {
        std::mem::replace(&mut self.is_alive, false)
    }

    pub fn build_context(&self, view: &GameView<'_>) -> PlayerContext {
        let alive_players = view
            .players
            .iter()
            .filter(|p| p.is_alive)
            .map(|p| PlayerInfo {
                id: p.id,
                is_alive: true,
            })
            .collect();
        PlayerContext {
            round: view.round,
            current_phase: view.phase,
            alive_players,
            all_speeches: view.speeches.clone(),
            all_votes: view.votes.clone(),
            role: (behaviour(self.role()).context)(self, view),
        }
    }

    pub async fn notify_start(&self, teammates: Vec<PlayerId>) -> Result<(), ActionError> {
        let params = StartGameParams {
            game_id: self.game_id,
            role: self.role(),
            player_id: self.id,
            teammates,
        };
        self.agent.start_game(&params).await?;
        Ok(())
    }

    pub async fn speak(&self, view: &GameView<'_>) -> Result<SpeechResponse, ActionError> {
        let context = self.build_context(view);
        let value = self.agent.speak(&context).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn vote(&self, view: &GameView<'_>) -> Result<VoteResponse, ActionError> {
        let context = self.build_context(view);
        let value = self.agent.vote(&context).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Asks for the night action. Roles without one get `Ok(None)` and the
    /// agent is never contacted.
    pub async fn use_ability(
        &self,
        view: &GameView<'_>,
    ) -> Result<Option<AbilityResult>, ActionError> {
        let Some(parse) = behaviour(self.role()).ability else {
            return Ok(None);
        };
        let context = self.build_context(view);
        let value = self.agent.use_ability(&context).await?;
        Ok(Some(parse(value)?))
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.is_alive { "alive" } else { "dead" };
        write!(f, "Player {} ({}, {})", self.id, self.role(), status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agents::{AgentCall, ScriptedAgent};
    use serde_json::json;
    use types::{Speech, Vote, WerewolfAction, WitchAction};

    struct Table {
        players: Vec<Player>,
        speeches: AllSpeeches,
        votes: AllVotes,
        night: NightTemp,
        investigations: BTreeMap<Round, Investigation>,
    }

    impl Table {
        fn new(players: Vec<Player>) -> Self {
            Self {
                players,
                speeches: AllSpeeches::new(),
                votes: AllVotes::new(),
                night: NightTemp::default(),
                investigations: BTreeMap::new(),
            }
        }

        fn view(&self, round: Round, phase: GamePhase) -> GameView<'_> {
            GameView {
                round,
                phase,
                players: &self.players,
                speeches: &self.speeches,
                votes: &self.votes,
                night: &self.night,
                investigations: &self.investigations,
            }
        }
    }

    fn seat(id: PlayerId, role: Role, agent: Arc<ScriptedAgent>) -> Player {
        Player::new(id, Uuid::nil(), role, agent)
    }

    fn quiet(id: PlayerId, role: Role) -> Player {
        seat(id, role, Arc::new(ScriptedAgent::new()))
    }

    #[test]
    fn test_potions_are_single_use() {
        let mut potions = WitchPotions::default();
        assert_eq!(potions.usage(), PotionUsage::default());
        assert!(potions.use_heal(3));
        assert!(!potions.use_heal(4));
        assert_eq!(potions.heal_used_on, 3);
        assert!(potions.has_poison());
        assert!(potions.use_poison(5));
        assert!(!potions.use_poison(6));
        assert_eq!(potions.usage(), PotionUsage { heal: true, poison: true });
    }

    #[test]
    fn test_kill_reports_previous_state() {
        let mut player = quiet(1, Role::Villager);
        assert!(player.kill());
        assert!(!player.is_alive());
        assert!(!player.kill());
    }

    #[test]
    fn test_context_lists_only_living_players() {
        let mut table = Table::new(vec![
            quiet(1, Role::Villager),
            quiet(2, Role::Werewolf),
            quiet(3, Role::Seer),
        ]);
        table.players[1].kill();
        table.speeches.insert(1, vec![Speech::system("hello")]);
        table.votes.insert(
            1,
            vec![Vote {
                voter_id: 1,
                target_id: 3,
            }],
        );

        let context = table.players[0].build_context(&table.view(2, GamePhase::Day));
        let alive: Vec<PlayerId> = context.alive_players.iter().map(|p| p.id).collect();
        assert_eq!(alive, vec![1, 3]);
        assert_eq!(context.round, 2);
        assert_eq!(context.current_phase, GamePhase::Day);
        assert_eq!(context.all_speeches, table.speeches);
        assert_eq!(context.all_votes, table.votes);
        assert_eq!(context.role, RoleContext::Plain {});
    }

    #[test]
    fn test_witch_sees_tonights_victim_and_potions() {
        let mut table = Table::new(vec![quiet(1, Role::Witch), quiet(2, Role::Villager)]);
        let context = table.players[0].build_context(&table.view(1, GamePhase::Night));
        assert_eq!(
            context.role,
            RoleContext::Witch {
                killed_tonight: 0,
                potion_used: PotionUsage::default(),
            }
        );

        table.night.werewolf_target = Some(2);
        if let Some(potions) = table.players[0].potions_mut() {
            potions.use_poison(2);
        }
        let context = table.players[0].build_context(&table.view(1, GamePhase::Night));
        assert_eq!(
            context.role,
            RoleContext::Witch {
                killed_tonight: 2,
                potion_used: PotionUsage { heal: false, poison: true },
            }
        );
    }

    #[test]
    fn test_seer_sees_only_own_investigations() {
        let mut table = Table::new(vec![quiet(1, Role::Seer), quiet(2, Role::Seer)]);
        table.investigations.insert(
            1,
            Investigation {
                seer: 1,
                result: SeerResult { target: 4, is_good: false },
            },
        );
        table.investigations.insert(
            2,
            Investigation {
                seer: 2,
                result: SeerResult { target: 5, is_good: true },
            },
        );
        let context = table.players[0].build_context(&table.view(3, GamePhase::Night));
        let RoleContext::Seer { investigated_players } = context.role else {
            panic!("expected seer context");
        };
        assert_eq!(investigated_players.len(), 1);
        assert_eq!(investigated_players[&1].target, 4);
    }

    #[test]
    fn test_only_villagers_lack_an_ability() {
        assert!(!quiet(1, Role::Villager).has_ability());
        assert!(quiet(2, Role::Werewolf).has_ability());
        assert!(quiet(3, Role::Seer).has_ability());
        assert!(quiet(4, Role::Witch).has_ability());
    }

    #[tokio::test]
    async fn test_villager_ability_makes_no_call() {
        let agent = Arc::new(ScriptedAgent::new().with_ability(json!({"action": "idle"})));
        let table = Table::new(vec![seat(1, Role::Villager, agent.clone())]);
        let result = table.players[0]
            .use_ability(&table.view(1, GamePhase::Night))
            .await
            .unwrap();
        assert_eq!(result, None);
        assert!(agent.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_werewolf_ability_is_parsed() {
        let agent = Arc::new(ScriptedAgent::new().with_ability(json!({
            "action": "kill",
            "target": 3,
            "reason": "too quiet",
        })));
        let table = Table::new(vec![seat(1, Role::Werewolf, agent)]);
        let result = table.players[0]
            .use_ability(&table.view(1, GamePhase::Night))
            .await
            .unwrap();
        let Some(AbilityResult::Werewolf(ability)) = result else {
            panic!("expected werewolf ability, got {result:?}");
        };
        assert_eq!(ability.action, WerewolfAction::Kill);
        assert_eq!(ability.target, 3);
    }

    #[tokio::test]
    async fn test_witch_ability_is_parsed() {
        let agent = Arc::new(ScriptedAgent::new().with_ability(json!({
            "action": "using",
            "healTarget": 3,
            "healReason": "trust",
            "poisonTarget": 0,
            "poisonReason": "",
        })));
        let table = Table::new(vec![seat(1, Role::Witch, agent)]);
        let result = table.players[0]
            .use_ability(&table.view(1, GamePhase::Night))
            .await
            .unwrap();
        let Some(AbilityResult::Witch(ability)) = result else {
            panic!("expected witch ability, got {result:?}");
        };
        assert_eq!(ability.action, WitchAction::Using);
        assert_eq!(ability.heal_target, 3);
    }

    #[tokio::test]
    async fn test_wrong_shape_is_a_schema_error() {
        let agent = Arc::new(
            ScriptedAgent::new()
                .with_ability(json!({"action": "dance", "target": 3, "reason": ""}))
                .with_raw_vote(Ok(json!({"target": "three", "reason": ""})))
                .with_raw_speech(Ok(json!({}))),
        );
        let table = Table::new(vec![seat(1, Role::Seer, agent)]);
        let view = table.view(1, GamePhase::Night);
        assert!(matches!(
            table.players[0].use_ability(&view).await,
            Err(ActionError::Schema(_))
        ));
        assert!(matches!(
            table.players[0].vote(&view).await,
            Err(ActionError::Schema(_))
        ));
        assert!(matches!(
            table.players[0].speak(&view).await,
            Err(ActionError::Schema(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_fields_are_ignored() {
        let agent = Arc::new(
            ScriptedAgent::new().with_raw_speech(Ok(json!({"speech": "hi", "mood": "calm"}))),
        );
        let table = Table::new(vec![seat(1, Role::Villager, agent)]);
        let response = table.players[0]
            .speak(&table.view(1, GamePhase::Day))
            .await
            .unwrap();
        assert_eq!(response.speech, "hi");
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces_as_agent_error() {
        let table = Table::new(vec![quiet(1, Role::Villager)]);
        let result = table.players[0].vote(&table.view(1, GamePhase::Voting)).await;
        assert!(matches!(
            result,
            Err(ActionError::Agent(AgentError::NoResponse(_)))
        ));
    }

    #[tokio::test]
    async fn test_notify_start_sends_seat() {
        let agent = Arc::new(ScriptedAgent::new());
        let player = seat(4, Role::Werewolf, agent.clone());
        player.notify_start(vec![6]).await.unwrap();
        let calls = agent.calls().await;
        assert_eq!(calls.len(), 1);
        let AgentCall::StartGame(params) = &calls[0] else {
            panic!("expected start game call, got {calls:?}");
        };
        assert_eq!(params.player_id, 4);
        assert_eq!(params.role, Role::Werewolf);
        assert_eq!(params.teammates, vec![6]);
    }
}
