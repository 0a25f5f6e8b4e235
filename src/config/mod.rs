//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::models::DEFAULT_RATING;
use crate::simulate::SimulationParams;
use crate::storage::OutputFormat;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Input file configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Column separator in players and round files
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Rating for players listed without one
    #[serde(default = "default_rating")]
    pub default_rating: i32,
}

fn default_separator() -> String {
    ",".to_string()
}

fn default_rating() -> i32 {
    DEFAULT_RATING
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            default_rating: default_rating(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Column separator in standings and pairings files
    #[serde(default = "default_separator")]
    pub separator: String,

    /// "text" or "jsonl"
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            format: OutputFormat::default(),
        }
    }
}

/// Simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_sim_players")]
    pub players: usize,

    #[serde(default = "default_sim_rounds")]
    pub rounds: usize,

    /// Number of tournaments to play
    #[serde(default = "default_sim_runs")]
    pub runs: u32,

    #[serde(default = "default_base_rating")]
    pub base_rating: i32,

    /// Ratings are drawn from `base_rating .. base_rating + rating_spread`
    #[serde(default = "default_rating_spread")]
    pub rating_spread: u32,
}

fn default_sim_players() -> usize {
    20
}

fn default_sim_rounds() -> usize {
    17
}

fn default_sim_runs() -> u32 {
    1
}

fn default_base_rating() -> i32 {
    1800
}

fn default_rating_spread() -> u32 {
    400
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            players: default_sim_players(),
            rounds: default_sim_rounds(),
            runs: default_sim_runs(),
            base_rating: default_base_rating(),
            rating_spread: default_rating_spread(),
        }
    }
}

impl SimulationConfig {
    pub fn params(&self) -> SimulationParams {
        SimulationParams {
            players: self.players,
            rounds: self.rounds,
            base_rating: self.base_rating,
            rating_spread: self.rating_spread,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Seed for tie-breaks; OS entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            seed: None,
            input: InputConfig::default(),
            output: OutputConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.separator.is_empty() || self.output.separator.is_empty() {
            return Err(ConfigError::ValidationError(
                "Separators must not be empty".to_string(),
            ));
        }

        self.validate_simulation()
    }

    /// Validate only the simulation section.
    pub fn validate_simulation(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if sim.players < 2 || sim.players % 2 != 0 {
            return Err(ConfigError::ValidationError(format!(
                "Simulation needs an even number of players, got {}",
                sim.players
            )));
        }

        if sim.rounds >= sim.players {
            return Err(ConfigError::ValidationError(format!(
                "{} players cannot play {} rounds without repeating opponents",
                sim.players, sim.rounds
            )));
        }

        if sim.runs == 0 {
            return Err(ConfigError::ValidationError(
                "Simulation runs must be greater than 0".to_string(),
            ));
        }

        if (sim.rating_spread as usize) < sim.players {
            return Err(ConfigError::ValidationError(
                "Rating spread must be at least the number of players".to_string(),
            ));
        }

        Ok(())
    }
}
