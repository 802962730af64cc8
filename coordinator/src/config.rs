use std::path::{Path, PathBuf};

use agents::AgentClientConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use types::PlayerId;

pub const PLAYER_URLS_ENV: &str = "WEREWOLF_PLAYER_URLS";

const DEFAULT_PLAYER_COUNT: u16 = 8;
const DEFAULT_FIRST_PORT: u16 = 3001;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("WEREWOLF_PLAYER_URLS must be a JSON array of URLs: {0}")]
    Env(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEndpoint {
    pub id: PlayerId,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub players: Vec<PlayerEndpoint>,
    pub agent: AgentClientConfig,
    pub seed: Option<u64>,
    pub max_rounds: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let urls: Vec<String> = (0..DEFAULT_PLAYER_COUNT)
            .map(|offset| format!("http://localhost:{}", DEFAULT_FIRST_PORT + offset))
            .collect();
        Self {
            players: endpoints_from_urls(&urls),
            agent: AgentClientConfig::default(),
            seed: None,
            max_rounds: None,
        }
    }
}

pub fn endpoints_from_urls(urls: &[String]) -> Vec<PlayerEndpoint> {
    urls.iter()
        .zip(1..)
        .map(|(url, id)| PlayerEndpoint {
            id,
            url: url.clone(),
        })
        .collect()
}

impl GameConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Player URLs come from the command line, then the environment, then the
    /// YAML file, then the eight local defaults.
    pub fn from_cli_or_env_or_yaml(
        cli_urls: &[String],
        yaml_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let config = match yaml_path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.with_player_overrides(cli_urls, std::env::var(PLAYER_URLS_ENV).ok())
    }

    pub fn with_player_overrides(
        mut self,
        cli_urls: &[String],
        env_urls: Option<String>,
    ) -> Result<Self, ConfigError> {
        if !cli_urls.is_empty() {
            self.players = endpoints_from_urls(cli_urls);
        } else if let Some(raw) = env_urls {
            let urls: Vec<String> = serde_json::from_str(&raw)?;
            self.players = endpoints_from_urls(&urls);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_local_agents() {
        let config = GameConfig::default();
        assert_eq!(config.players.len(), 8);
        assert_eq!(
            config.players[0],
            PlayerEndpoint {
                id: 1,
                url: "http://localhost:3001".to_string()
            }
        );
        assert_eq!(config.players[7].url, "http://localhost:3008");
        assert_eq!(config.agent, AgentClientConfig::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = GameConfig::from_yaml_str(
            "seed: 42\nagent:\n  max_attempts: 5\nplayers:\n  - id: 7\n    url: http://agent:9000\n",
        )
        .unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.agent.max_attempts, 5);
        assert_eq!(config.agent.timeout_secs, AgentClientConfig::default().timeout_secs);
        assert_eq!(config.players.len(), 1);
        assert_eq!(config.players[0].id, 7);
    }

    #[test]
    fn test_cli_beats_env() {
        let cli = vec!["http://a".to_string(), "http://b".to_string()];
        let config = GameConfig::default()
            .with_player_overrides(&cli, Some(r#"["http://c"]"#.to_string()))
            .unwrap();
        let urls: Vec<&str> = config.players.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec!["http://a", "http://b"]);
        assert_eq!(config.players[1].id, 2);
    }

    #[test]
    fn test_env_beats_yaml() {
        let yaml =
            GameConfig::from_yaml_str("players:\n  - id: 1\n    url: http://yaml\n").unwrap();
        let config = yaml
            .with_player_overrides(&[], Some(r#"["http://env1", "http://env2"]"#.to_string()))
            .unwrap();
        assert_eq!(config.players.len(), 2);
        assert_eq!(config.players[0].url, "http://env1");
    }

    #[test]
    fn test_bad_env_is_reported() {
        let result = GameConfig::default().with_player_overrides(&[], Some("not json".to_string()));
        assert!(matches!(result, Err(ConfigError::Env(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = GameConfig::from_yaml_file(Path::new("/nonexistent/werewolf.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
