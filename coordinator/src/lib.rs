use std::time::Duration;

use types::{GamePhase, WinCondition};

pub mod config;
pub mod error;
pub mod game;
pub mod manager;
pub mod night;
pub mod player;

pub use config::{endpoints_from_urls, ConfigError, GameConfig, PlayerEndpoint, PLAYER_URLS_ENV};
pub use error::GameError;
pub use game::{Game, GameSnapshot, PlayerSummary};
pub use manager::GameManager;
pub use night::NightTemp;
pub use player::{ActionError, GameView, Investigation, Player, RoleState, WitchPotions};

/// Starts a game whose roles are already dealt and keeps advancing it until it
/// ends or `max_rounds` full rounds have been played.
pub async fn run_game(
    game: &mut Game,
    delay_ms: Option<u64>,
    max_rounds: Option<u32>,
) -> Result<WinCondition, GameError> {
    game.start_game().await?;
    while game.phase() != GamePhase::Ended {
        log::debug!("Game {} at {} of round {}", game.id(), game.phase(), game.round());
        if max_rounds.is_some_and(|max| game.phase() == GamePhase::Voting && game.round() >= max) {
            log::info!("Stopping game {} after {} rounds", game.id(), game.round());
            break;
        }
        if let Some(ms) = delay_ms {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
        game.next_phase().await?;
    }
    Ok(game.win_condition())
}
