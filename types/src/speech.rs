use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{PlayerId, Round};

/// Speaker id used for announcements made by the game itself.
pub const SYSTEM_SPEAKER: PlayerId = -1;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechKind {
    Player,
    System,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Speech {
    pub player_id: PlayerId,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: SpeechKind,
}

impl Speech {
    pub fn player(player_id: PlayerId, content: impl Into<String>) -> Self {
        Self {
            player_id,
            content: content.into(),
            kind: SpeechKind::Player,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            player_id: SYSTEM_SPEAKER,
            content: content.into(),
            kind: SpeechKind::System,
        }
    }

    pub fn is_system(&self) -> bool {
        self.kind == SpeechKind::System
    }
}

impl Display for Speech {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            SpeechKind::System => write!(f, "[system] {}", self.content),
            SpeechKind::Player => write!(f, "[player {}] {}", self.player_id, self.content),
        }
    }
}

pub type AllSpeeches = BTreeMap<Round, Vec<Speech>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_speech_uses_sentinel() {
        let speech = Speech::system("Night falls");
        assert_eq!(speech.player_id, SYSTEM_SPEAKER);
        assert!(speech.is_system());
    }

    #[test]
    fn test_speech_wire_shape() {
        let value = serde_json::to_value(Speech::player(3, "I trust 4")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"playerId": 3, "content": "I trust 4", "type": "player"})
        );
    }
}
