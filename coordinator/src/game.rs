use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;

use agents::{AgentClientConfig, HttpAgent};
use itertools::Itertools;
use journal::{GameJournal, GameRecorder, NoopRecorder, OperationLogEntry};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use types::{
    default_role_config, evaluate_win, expand_roles, AbilityResult, Agent, AllSpeeches, AllVotes,
    GamePhase, InvestigatedPlayers, PlayerId, Role, RoleConfigError, Round, SeerResult, Speech,
    Vote, VoteResponse, WerewolfAction, WinCondition, WitchAbility, WitchAction, MIN_PLAYERS,
};
use uuid::Uuid;

use crate::error::GameError;
use crate::night::NightTemp;
use crate::player::{GameView, Investigation, Player};

#[derive(Clone, Debug)]
struct Seat {
    id: PlayerId,
    agent: Arc<dyn Agent>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub is_alive: bool,
    pub role: Option<Role>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub game_id: Uuid,
    pub current_phase: GamePhase,
    pub round: Round,
    pub players: Vec<PlayerSummary>,
}

/// A single game of werewolf, from the first join to the final announcement.
///
/// Every phase is run to completion inside [`Game::start_game`] or
/// [`Game::next_phase`]; agents are asked one at a time in seat order and a
/// failing agent only costs that player their turn.
#[derive(Debug)]
pub struct Game {
    id: Uuid,
    expected_players: usize,
    phase: GamePhase,
    round: Round,
    seats: Vec<Seat>,
    players: Vec<Player>,
    votes: BTreeMap<PlayerId, PlayerId>,
    all_votes: AllVotes,
    night: NightTemp,
    investigations: BTreeMap<Round, Investigation>,
    journal: GameJournal,
}

impl Game {
    pub fn new(expected_players: usize) -> Self {
        Self::with_recorder(expected_players, Box::new(NoopRecorder))
    }

    pub fn with_recorder(expected_players: usize, recorder: Box<dyn GameRecorder>) -> Self {
        let id = Uuid::new_v4();
        let mut journal = GameJournal::new(recorder);
        journal.log_system_action(format!(
            "Game {id} created, waiting for {expected_players} players"
        ));
        log::info!("Created game {id} for {expected_players} players");
        Self {
            id,
            expected_players,
            phase: GamePhase::Preparing,
            round: 0,
            seats: Vec::new(),
            players: Vec::new(),
            votes: BTreeMap::new(),
            all_votes: AllVotes::new(),
            night: NightTemp::default(),
            investigations: BTreeMap::new(),
            journal,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn round(&self) -> Round {
        self.round
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }

    pub fn add_player(&mut self, id: PlayerId, agent: Arc<dyn Agent>) -> Result<(), GameError> {
        if !self.players.is_empty() {
            return Err(GameError::RolesAlreadyAssigned);
        }
        if id <= 0 {
            return Err(GameError::InvalidPlayerId(id));
        }
        if self.seats.iter().any(|seat| seat.id == id) {
            return Err(GameError::DuplicatePlayer(id));
        }
        self.seats.push(Seat { id, agent });
        self.journal.log_system_action(format!(
            "Player {id} joined ({}/{})",
            self.seats.len(),
            self.expected_players
        ));
        log::debug!("Player {id} joined game {}", self.id);
        Ok(())
    }

    pub fn add_remote_player(
        &mut self,
        id: PlayerId,
        url: &str,
        config: &AgentClientConfig,
    ) -> Result<(), GameError> {
        let agent = HttpAgent::new(id, url, config.clone())?;
        self.add_player(id, Arc::new(agent))
    }

    pub fn assign_roles(&mut self) -> Result<(), GameError> {
        self.assign_roles_with_rng(&mut rand::thread_rng())
    }

    pub fn assign_roles_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), GameError> {
        self.check_seats()?;
        let config = default_role_config(self.seats.len()).map_err(|err| match err {
            RoleConfigError::TooFewPlayers(actual) => GameError::TooFewPlayers {
                minimum: MIN_PLAYERS,
                actual,
            },
        })?;
        let mut roles = expand_roles(&config);
        roles.shuffle(rng);
        self.deal(roles)
    }

    /// Deals `roles` to the joined players in join order, without shuffling.
    pub fn assign_roles_in_order(&mut self, roles: &[Role]) -> Result<(), GameError> {
        self.check_seats()?;
        if roles.len() != self.seats.len() {
            return Err(GameError::PlayerCountMismatch {
                expected: roles.len(),
                actual: self.seats.len(),
            });
        }
        self.deal(roles.to_vec())
    }

    fn check_seats(&self) -> Result<(), GameError> {
        if !self.players.is_empty() {
            return Err(GameError::RolesAlreadyAssigned);
        }
        if self.seats.len() != self.expected_players {
            return Err(GameError::PlayerCountMismatch {
                expected: self.expected_players,
                actual: self.seats.len(),
            });
        }
        Ok(())
    }

    fn deal(&mut self, roles: Vec<Role>) -> Result<(), GameError> {
        self.journal
            .log_system_action(format!("Assigning roles to {} players", roles.len()));
        let seats = std::mem::take(&mut self.seats);
        self.players = seats
            .into_iter()
            .zip(roles)
            .map(|(seat, role)| {
                log::info!("Player {} is a {role}", seat.id);
                Player::new(seat.id, self.id, role, seat.agent)
            })
            .collect();
        self.journal.log_system_action("Roles assigned");
        Ok(())
    }

    pub async fn start_game(&mut self) -> Result<(), GameError> {
        if self.phase != GamePhase::Preparing {
            return Err(GameError::AlreadyStarted);
        }
        if self.players.is_empty() {
            return Err(GameError::RolesNotAssigned);
        }
        self.phase = GamePhase::Night;
        self.round = 1;
        log::info!("Game {} started with {} players", self.id, self.players.len());
        self.journal.log_system_action("Game started");
        self.journal.log_phase_change(self.phase, self.round);
        self.journal
            .announce(self.round, "The game begins! Night 1 falls.");

        self.notify_players().await;
        self.run_phase().await;
        Ok(())
    }

    /// Advances Night -> Day -> Voting -> Night, running the new phase.
    ///
    /// Entering Night starts a new round. Once the game has ended this does
    /// nothing and keeps returning [`GamePhase::Ended`].
    pub async fn next_phase(&mut self) -> Result<GamePhase, GameError> {
        let Some(next) = self.phase.next_in_cycle() else {
            return match self.phase {
                GamePhase::Ended => {
                    log::debug!("Game {} already ended", self.id);
                    Ok(GamePhase::Ended)
                }
                _ => Err(GameError::NotStarted),
            };
        };
        if next == GamePhase::Night {
            self.round += 1;
        }
        self.phase = next;
        log::info!("Game {} entering {next} of round {}", self.id, self.round);
        self.journal.log_phase_change(next, self.round);
        self.journal
            .announce(self.round, format!("{next} phase of day {} begins.", self.round));

        self.run_phase().await;
        Ok(self.phase)
    }

    pub fn cast_vote(&mut self, voter_id: PlayerId, target_id: PlayerId) {
        self.votes.insert(voter_id, target_id);
        let ballots = self.all_votes.entry(self.round).or_default();
        match ballots.iter_mut().find(|vote| vote.voter_id == voter_id) {
            Some(vote) => vote.target_id = target_id,
            None => ballots.push(Vote { voter_id, target_id }),
        }
    }

    /// Who would win if the game stopped now. Has no side effects.
    pub fn win_condition(&self) -> WinCondition {
        if self.players.is_empty() {
            return WinCondition::Ongoing;
        }
        let (werewolves, good): (Vec<&Player>, Vec<&Player>) = self
            .players
            .iter()
            .filter(|p| p.is_alive())
            .partition(|p| p.role().is_werewolf());
        evaluate_win(werewolves.len(), good.len())
    }

    pub fn game_state(&self) -> GameSnapshot {
        let players = if self.players.is_empty() {
            self.seats
                .iter()
                .map(|seat| PlayerSummary {
                    id: seat.id,
                    is_alive: true,
                    role: None,
                })
                .collect()
        } else {
            self.players
                .iter()
                .map(|p| PlayerSummary {
                    id: p.id(),
                    is_alive: p.is_alive(),
                    role: Some(p.role()),
                })
                .collect()
        };
        GameSnapshot {
            game_id: self.id,
            current_phase: self.phase,
            round: self.round,
            players,
        }
    }

    pub fn speeches(&self) -> &AllSpeeches {
        self.journal.all_speeches()
    }

    pub fn operation_logs(&self) -> &[OperationLogEntry] {
        self.journal.operations()
    }

    pub fn recent_operation_logs(&self, count: usize) -> &[OperationLogEntry] {
        self.journal.recent_operations(count)
    }

    pub fn investigated_players(&self) -> InvestigatedPlayers {
        self.investigations
            .iter()
            .map(|(round, investigation)| (*round, investigation.result))
            .collect()
    }

    pub fn vote_history(&self) -> &AllVotes {
        &self.all_votes
    }

    pub fn current_votes(&self) -> &BTreeMap<PlayerId, PlayerId> {
        &self.votes
    }

    pub fn night_state(&self) -> &NightTemp {
        &self.night
    }

    fn view(&self) -> GameView<'_> {
        GameView {
            round: self.round,
            phase: self.phase,
            players: &self.players,
            speeches: self.journal.all_speeches(),
            votes: &self.all_votes,
            night: &self.night,
            investigations: &self.investigations,
        }
    }

    fn index_of(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id() == id)
    }

    fn first_alive(&self, role: Role) -> Option<usize> {
        self.players
            .iter()
            .position(|p| p.is_alive() && p.role() == role)
    }

    fn failed(&mut self, player_id: PlayerId, what: &str, err: impl Display) {
        log::warn!("Player {player_id} failed to {what}: {err}");
        self.journal
            .log_result(format!("Player {player_id} failed to {what}: {err}"));
    }

    async fn notify_players(&mut self) {
        let werewolves: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|p| p.role().is_werewolf())
            .map(|p| p.id())
            .collect();
        for idx in 0..self.players.len() {
            let id = self.players[idx].id();
            let teammates = if self.players[idx].role().is_werewolf() {
                werewolves.iter().copied().filter(|&w| w != id).collect()
            } else {
                Vec::new()
            };
            let outcome = self.players[idx].notify_start(teammates).await;
            match outcome {
                Ok(()) => log::debug!("Player {id} acknowledged the start"),
                Err(err) => self.failed(id, "acknowledge the start", err),
            }
        }
    }

    async fn run_phase(&mut self) {
        match self.phase {
            GamePhase::Night => self.run_night().await,
            GamePhase::Day => self.run_day().await,
            GamePhase::Voting => self.run_voting().await,
            GamePhase::Preparing | GamePhase::Ended => {}
        }
    }

    async fn run_night(&mut self) {
        self.night = NightTemp::default();
        self.werewolf_turn().await;
        self.seer_turn().await;
        self.witch_turn().await;
        if self.settle_night() != WinCondition::Ongoing {
            return;
        }
        self.journal.log_phase_complete(GamePhase::Night);
    }

    async fn werewolf_turn(&mut self) {
        let Some(idx) = self.first_alive(Role::Werewolf) else {
            return;
        };
        let id = self.players[idx].id();
        self.journal.log_player_request(id, "pick tonight's victim");
        let outcome = self.players[idx].use_ability(&self.view()).await;
        match outcome {
            Ok(Some(AbilityResult::Werewolf(ability))) => {
                let answer = format!(
                    "{:?} player {}: {}",
                    ability.action, ability.target, ability.reason
                );
                self.journal
                    .log_player_response(id, "answered", Some(answer.as_str()));
                if ability.action == WerewolfAction::Kill && ability.target > 0 {
                    self.night.werewolf_target = Some(ability.target);
                }
            }
            Ok(other) => self.failed(id, "pick a victim", format!("unexpected answer {other:?}")),
            Err(err) => self.failed(id, "pick a victim", err),
        }
    }

    async fn seer_turn(&mut self) {
        let Some(idx) = self.first_alive(Role::Seer) else {
            return;
        };
        let id = self.players[idx].id();
        self.journal.log_player_request(id, "investigate someone");
        let outcome = self.players[idx].use_ability(&self.view()).await;
        let ability = match outcome {
            Ok(Some(AbilityResult::Seer(ability))) => ability,
            Ok(other) => {
                return self.failed(id, "investigate", format!("unexpected answer {other:?}"))
            }
            Err(err) => return self.failed(id, "investigate", err),
        };
        let Some(target) = self.player(ability.target) else {
            return self.failed(
                id,
                "investigate",
                format!("player {} is not at the table", ability.target),
            );
        };
        let is_good = !target.role().is_werewolf();
        let verdict = if is_good { "good" } else { "a werewolf" };
        self.investigations.insert(
            self.round,
            Investigation {
                seer: id,
                result: SeerResult {
                    target: ability.target,
                    is_good,
                },
            },
        );
        self.journal.log_player_response(
            id,
            "investigated",
            Some(format!("player {} is {verdict}", ability.target).as_str()),
        );
    }

    async fn witch_turn(&mut self) {
        let Some(idx) = self.first_alive(Role::Witch) else {
            return;
        };
        let id = self.players[idx].id();
        self.journal.log_player_request(id, "decide on potions");
        let outcome = self.players[idx].use_ability(&self.view()).await;
        match outcome {
            Ok(Some(AbilityResult::Witch(ability))) => self.apply_potions(idx, ability),
            Ok(other) => self.failed(id, "use potions", format!("unexpected answer {other:?}")),
            Err(err) => self.failed(id, "use potions", err),
        }
    }

    fn apply_potions(&mut self, idx: usize, ability: WitchAbility) {
        let id = self.players[idx].id();
        if ability.action == WitchAction::Idle {
            self.journal.log_player_response(
                id,
                "used no potion",
                Some(ability.heal_reason.as_str()),
            );
            return;
        }
        let heal = ability.heal_target;
        let poison = ability.poison_target;
        if heal > 0 && heal == poison {
            self.journal.log_player_response(
                id,
                "failed to use potions",
                Some(format!("cannot heal and poison player {heal} in one night").as_str()),
            );
            return;
        }

        if heal > 0 {
            let used = self.players[idx]
                .potions_mut()
                .is_some_and(|potions| potions.use_heal(heal));
            if used {
                self.night.witch_heal_target = Some(heal);
                self.journal.log_player_response(
                    id,
                    "used the heal potion",
                    Some(format!("on player {heal}: {}", ability.heal_reason).as_str()),
                );
            } else {
                self.journal.log_player_response(
                    id,
                    "failed to use the heal potion",
                    Some("it is already spent"),
                );
            }
        }

        if poison > 0 {
            let used = self.players[idx]
                .potions_mut()
                .is_some_and(|potions| potions.use_poison(poison));
            if used {
                self.night.witch_poison_target = Some(poison);
                self.journal.log_player_response(
                    id,
                    "used the poison potion",
                    Some(format!("on player {poison}: {}", ability.poison_reason).as_str()),
                );
            } else {
                self.journal.log_player_response(
                    id,
                    "failed to use the poison potion",
                    Some("it is already spent"),
                );
            }
        }
    }

    fn settle_night(&mut self) -> WinCondition {
        let mut died = Vec::new();
        for target in self.night.deaths() {
            match self.players.iter_mut().find(|p| p.id() == target) {
                Some(player) => {
                    if player.kill() {
                        died.push(target);
                    }
                }
                None => log::warn!("Night target {target} is not at the table"),
            }
        }

        for id in &died {
            log::info!("Player {id} died during night {}", self.round);
            self.journal
                .log_result(format!("Player {id} died during the night"));
        }
        let announcement = match died.as_slice() {
            [] => "Peaceful night, nobody died.".to_string(),
            [id] => format!("Last night, player {id} died."),
            ids => format!("Last night, players {} died.", ids.iter().join(", ")),
        };
        self.journal.announce(self.round, announcement);
        self.check_win_condition()
    }

    async fn run_day(&mut self) {
        for idx in 0..self.players.len() {
            if !self.players[idx].is_alive() {
                continue;
            }
            let id = self.players[idx].id();
            self.journal.log_player_request(id, "speak");
            let outcome = self.players[idx].speak(&self.view()).await;
            match outcome {
                Ok(response) => {
                    self.journal.log_player_response(
                        id,
                        "spoke",
                        Some(format!("\"{}\"", response.speech).as_str()),
                    );
                    self.journal
                        .add_speech(self.round, Speech::player(id, response.speech));
                }
                Err(err) => self.failed(id, "speak", err),
            }
        }
        self.journal.log_phase_complete(GamePhase::Day);
    }

    async fn run_voting(&mut self) {
        for idx in 0..self.players.len() {
            if !self.players[idx].is_alive() {
                continue;
            }
            let id = self.players[idx].id();
            self.journal.log_player_request(id, "vote");
            let outcome = self.players[idx].vote(&self.view()).await;
            match outcome {
                Ok(VoteResponse { target, reason }) => {
                    self.journal.log_player_response(
                        id,
                        "voted",
                        Some(format!("for player {target}: {reason}").as_str()),
                    );
                    if self.index_of(target).is_some() {
                        self.cast_vote(id, target);
                    } else {
                        self.journal.log_result(format!(
                            "Vote from player {id} for unknown player {target} discarded"
                        ));
                    }
                }
                Err(err) => self.failed(id, "vote", err),
            }
        }

        self.journal.log_system_action("Counting votes");
        let counts = types::count_votes(self.votes.values());
        let eliminated = types::determine_elimination(&counts);
        self.votes.clear();

        match eliminated {
            Some(target) => {
                let died = self
                    .index_of(target)
                    .is_some_and(|idx| self.players[idx].kill());
                if !died {
                    log::info!("Vote landed on player {target}, who was already dead");
                    self.journal.log_result(format!(
                        "Player {target} was already dead, nobody was eliminated"
                    ));
                    self.journal.announce(
                        self.round,
                        format!("Player {target} was already dead, nobody was eliminated."),
                    );
                    self.journal.log_phase_complete(GamePhase::Voting);
                    return;
                }
                log::info!("Player {target} was voted out in round {}", self.round);
                self.journal
                    .log_result(format!("Player {target} was voted out"));
                self.journal
                    .announce(self.round, format!("Player {target} was voted out."));
                if self.check_win_condition() != WinCondition::Ongoing {
                    return;
                }
            }
            None => {
                self.journal
                    .log_result("Vote tied, nobody was eliminated");
                self.journal
                    .announce(self.round, "The vote was tied, nobody was eliminated.");
            }
        }
        self.journal.log_phase_complete(GamePhase::Voting);
    }

    fn check_win_condition(&mut self) -> WinCondition {
        let outcome = self.win_condition();
        if outcome != WinCondition::Ongoing {
            self.phase = GamePhase::Ended;
            log::info!("Game {} over after round {}: {outcome}", self.id, self.round);
            self.journal.log_result(format!("Game over: {outcome}"));
            self.journal
                .announce(self.round, format!("Game over! {outcome}."));
        }
        outcome
    }
}
