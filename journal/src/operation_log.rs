use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use types::{GamePhase, PlayerId, Round};
use uuid::Uuid;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    PhaseChange,
    PlayerRequest,
    PlayerResponse,
    SystemAction,
    Result,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<GamePhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationLogEntry {
    pub id: Uuid,
    // Total order of the log; timestamps may collide.
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<OperationDetails>,
}

#[derive(Clone, Debug, Default)]
pub struct OperationLog {
    entries: Vec<OperationLogEntry>,
    next_sequence: u64,
}

impl OperationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(
        &mut self,
        kind: OperationKind,
        message: String,
        details: Option<OperationDetails>,
    ) -> &OperationLogEntry {
        let entry = OperationLogEntry {
            id: Uuid::new_v4(),
            sequence: self.next_sequence,
            timestamp: Utc::now(),
            kind,
            message,
            details,
        };
        self.next_sequence += 1;
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[OperationLogEntry] {
        &self.entries
    }

    pub fn recent(&self, count: usize) -> &[OperationLogEntry] {
        let start = self.entries.len().saturating_sub(count);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn log_phase_change(&mut self, phase: GamePhase, round: Round) -> &OperationLogEntry {
        self.append(
            OperationKind::PhaseChange,
            format!("Game entered {phase} phase (day {round})"),
            Some(OperationDetails {
                phase: Some(phase),
                ..Default::default()
            }),
        )
    }

    pub fn log_player_request(&mut self, player_id: PlayerId, action: &str) -> &OperationLogEntry {
        self.append(
            OperationKind::PlayerRequest,
            format!("Asked player {player_id} to {action}"),
            Some(OperationDetails {
                player_id: Some(player_id),
                action_type: Some(action.to_string()),
                ..Default::default()
            }),
        )
    }

    pub fn log_player_response(
        &mut self,
        player_id: PlayerId,
        action: &str,
        result: Option<&str>,
    ) -> &OperationLogEntry {
        let message = match result {
            Some(result) => format!("Player {player_id} {action}: {result}"),
            None => format!("Player {player_id} {action}"),
        };
        self.append(
            OperationKind::PlayerResponse,
            message,
            Some(OperationDetails {
                player_id: Some(player_id),
                action_type: Some(action.to_string()),
                result: result.map(str::to_string),
                ..Default::default()
            }),
        )
    }

    pub fn log_system_action(&mut self, message: impl Into<String>) -> &OperationLogEntry {
        self.append(OperationKind::SystemAction, message.into(), None)
    }

    pub fn log_result(&mut self, message: impl Into<String>) -> &OperationLogEntry {
        self.append(OperationKind::Result, message.into(), None)
    }

    pub fn log_phase_complete(&mut self, phase: GamePhase) -> &OperationLogEntry {
        self.append(
            OperationKind::SystemAction,
            format!("{phase} phase complete"),
            Some(OperationDetails {
                phase: Some(phase),
                ..Default::default()
            }),
        )
    }
}
