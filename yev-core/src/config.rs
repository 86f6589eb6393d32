//! Configuration schema for yev.
//!
//! One YAML file drives the engine, the simulator and event logging. Every
//! section and field has a default, so an empty document is a valid config.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Decision engine settings.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Game simulation settings.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// NDJSON event log settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Decision engine configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Physical rolls allowed per turn (1..=3).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u8,
}

fn default_max_attempts() -> u8 {
    3
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
        }
    }
}

/// Strategy identifiers accepted in config files and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Random,
    Greedy,
    Rare,
    ExpectedValue,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Random,
        StrategyKind::Greedy,
        StrategyKind::Rare,
        StrategyKind::ExpectedValue,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Random => "random",
            StrategyKind::Greedy => "greedy",
            StrategyKind::Rare => "rare",
            StrategyKind::ExpectedValue => "expected_value",
        }
    }

    pub fn parse(s: &str) -> Option<StrategyKind> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Some(StrategyKind::Random),
            "greedy" => Some(StrategyKind::Greedy),
            "rare" => Some(StrategyKind::Rare),
            "expected_value" | "ev" => Some(StrategyKind::ExpectedValue),
            _ => None,
        }
    }
}

/// Simulation configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Games per strategy.
    #[serde(default = "default_games")]
    pub games: u32,
    /// Base seed; game `i` uses `seed + i`.
    #[serde(default)]
    pub seed: u64,
    /// Strategies to run, in report order.
    #[serde(default = "default_strategies")]
    pub strategies: Vec<StrategyKind>,
    /// Optional rayon pool size (defaults to rayon's own choice).
    #[serde(default)]
    pub threads: Option<usize>,
}

fn default_games() -> u32 {
    1000
}

fn default_strategies() -> Vec<StrategyKind> {
    StrategyKind::ALL.to_vec()
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            games: default_games(),
            seed: 0,
            strategies: default_strategies(),
            threads: None,
        }
    }
}

/// Event logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// NDJSON events file; `None` disables event logging.
    #[serde(default)]
    pub events_path: Option<String>,
    /// Flush every N lines (0 = only on close).
    #[serde(default)]
    pub flush_every: u64,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=3).contains(&self.engine.max_attempts) {
            return Err(ConfigError::Invalid(format!(
                "engine.max_attempts must be in 1..=3, got {}",
                self.engine.max_attempts
            )));
        }
        if self.simulation.strategies.is_empty() {
            return Err(ConfigError::Invalid(
                "simulation.strategies must not be empty".to_string(),
            ));
        }
        if self.simulation.threads == Some(0) {
            return Err(ConfigError::Invalid(
                "simulation.threads must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_yaml() {
        let config =
            Config::load("../configs/default.yaml").expect("Failed to load configs/default.yaml");

        assert_eq!(config.engine.max_attempts, 3);
        assert_eq!(config.simulation.games, 1000);
        assert_eq!(config.simulation.seed, 0);
        assert_eq!(config.simulation.strategies, StrategyKind::ALL.to_vec());
        assert_eq!(config.logging.events_path, None);
    }

    #[test]
    fn test_parse_yaml_string() {
        let yaml = r#"
engine:
  max_attempts: 2

simulation:
  games: 50
  seed: 7
  strategies: [greedy, expected_value]

logging:
  events_path: "logs/events.ndjson"
  flush_every: 100
"#;

        let config = Config::from_yaml(yaml).expect("Failed to parse YAML");
        assert_eq!(config.engine.max_attempts, 2);
        assert_eq!(config.simulation.games, 50);
        assert_eq!(
            config.simulation.strategies,
            vec![StrategyKind::Greedy, StrategyKind::ExpectedValue]
        );
        // Omitted field falls back to its default.
        assert_eq!(config.simulation.threads, None);
        assert_eq!(
            config.logging.events_path.as_deref(),
            Some("logs/events.ndjson")
        );
        assert_eq!(config.logging.flush_every, 100);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
        assert_eq!(Config::from_yaml("engine: {}\n").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_yaml_fails() {
        let invalid_yaml = "this is not: valid: yaml: {{{}}}";
        assert!(matches!(
            Config::from_yaml(invalid_yaml),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_validation_rejects_out_of_range_attempts() {
        let err = Config::from_yaml("engine:\n  max_attempts: 4\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
        let err = Config::from_yaml("engine:\n  max_attempts: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
    }

    #[test]
    fn test_validation_rejects_empty_strategy_list() {
        let err = Config::from_yaml("simulation:\n  strategies: []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_yaml_roundtrip_preserves_config() {
        let mut config = Config::default();
        config.simulation.threads = Some(4);
        config.engine.max_attempts = 2;
        let yaml = config.to_yaml().unwrap();
        assert_eq!(Config::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn strategy_kind_parse_accepts_aliases() {
        assert_eq!(StrategyKind::parse("EV"), Some(StrategyKind::ExpectedValue));
        assert_eq!(StrategyKind::parse(" rare "), Some(StrategyKind::Rare));
        assert_eq!(StrategyKind::parse("oracle"), None);
        for k in StrategyKind::ALL {
            assert_eq!(StrategyKind::parse(k.as_str()), Some(k));
        }
    }
}
