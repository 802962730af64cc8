use std::path::PathBuf;
use std::sync::Arc;

use agents::RandomAgent;
use clap::Parser;
use coordinator::{Game, GameConfig};
use journal::LogRecorder;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use types::PlayerId;

#[derive(Parser, Debug)]
struct Params {
    /// YAML file with players, agent client settings, seed and round limit.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Agent base URL; repeat once per player.
    #[arg(short, long)]
    player: Vec<String>,
    /// Play with N built-in random agents instead of remote ones.
    #[arg(long)]
    offline: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    max_rounds: Option<u32>,
    #[arg(long)]
    delay_ms: Option<u64>,
}

fn build_game(args: &Params, config: &GameConfig) -> Result<Game, coordinator::GameError> {
    let mut game = match args.offline {
        Some(count) => {
            let mut game = Game::with_recorder(count, Box::new(LogRecorder));
            for id in 1..=count {
                game.add_player(id as PlayerId, Arc::new(RandomAgent::new()))?;
            }
            game
        }
        None => {
            let mut game = Game::with_recorder(config.players.len(), Box::new(LogRecorder));
            for endpoint in &config.players {
                game.add_remote_player(endpoint.id, &endpoint.url, &config.agent)?;
            }
            game
        }
    };
    match config.seed {
        Some(seed) => game.assign_roles_with_rng(&mut StdRng::seed_from_u64(seed))?,
        None => game.assign_roles()?,
    }
    Ok(game)
}

async fn run(args: Params) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = GameConfig::from_cli_or_env_or_yaml(&args.player, args.config.as_deref())?;
    config.seed = args.seed.or(config.seed);
    config.max_rounds = args.max_rounds.or(config.max_rounds);

    let mut game = build_game(&args, &config)?;
    let winner = coordinator::run_game(&mut game, args.delay_ms, config.max_rounds).await?;
    log::info!("Game {} finished: {winner}", game.id());

    let summary = json!({
        "state": game.game_state(),
        "winner": winner,
        "speeches": game.speeches(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = Params::parse();
    log::info!("args: {args:?}");
    if let Err(err) = run(args).await {
        log::error!("{err}");
        std::process::exit(1);
    }
}
