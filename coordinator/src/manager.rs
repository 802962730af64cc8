use std::collections::HashMap;
use std::sync::Arc;

use journal::GameRecorder;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::GameError;
use crate::game::Game;

/// Owns every live game. Each game sits behind its own lock so separate games
/// never wait on each other.
#[derive(Debug, Default)]
pub struct GameManager {
    games: HashMap<Uuid, Arc<Mutex<Game>>>,
}

impl GameManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_game(&mut self, player_count: usize) -> Uuid {
        self.insert(Game::new(player_count))
    }

    pub fn create_game_with_recorder(
        &mut self,
        player_count: usize,
        recorder: Box<dyn GameRecorder>,
    ) -> Uuid {
        self.insert(Game::with_recorder(player_count, recorder))
    }

    fn insert(&mut self, game: Game) -> Uuid {
        let id = game.id();
        self.games.insert(id, Arc::new(Mutex::new(game)));
        id
    }

    pub fn game(&self, id: Uuid) -> Result<Arc<Mutex<Game>>, GameError> {
        self.games
            .get(&id)
            .cloned()
            .ok_or(GameError::UnknownGame(id))
    }

    pub fn remove_game(&mut self, id: Uuid) -> bool {
        let removed = self.games.remove(&id).is_some();
        if removed {
            log::info!("Removed game {id}");
        }
        removed
    }

    pub fn game_ids(&self) -> Vec<Uuid> {
        self.games.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
