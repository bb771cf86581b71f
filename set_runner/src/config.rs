//! Runner configuration management.
//!
//! Builds the game configuration from, in increasing priority: built-in
//! defaults, an optional JSON file, environment variables and command-line
//! flags.

use set_engine::GameConfig;
use std::path::{Path, PathBuf};

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// JSON configuration file
    pub config_file: Option<PathBuf>,
    pub humans: Option<usize>,
    pub computers: Option<usize>,
    pub hints: bool,
}

/// Load and validate the game configuration
pub fn load(overrides: &CliOverrides) -> Result<GameConfig, ConfigError> {
    let mut config = match &overrides.config_file {
        Some(path) => from_file(path)?,
        None => GameConfig::default(),
    };

    apply_env(&mut config);

    if let Some(humans) = overrides.humans {
        config.human_players = humans;
    }
    if let Some(computers) = overrides.computers {
        config.computer_players = computers;
    }
    if overrides.hints {
        config.hints = true;
    }

    config.validate()?;
    Ok(config)
}

/// Read a JSON configuration file. Missing fields keep their defaults.
pub fn from_file(path: &Path) -> Result<GameConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Override configuration values from `SET_*` environment variables
fn apply_env(config: &mut GameConfig) {
    config.table_size = parse_env_or("SET_TABLE_SIZE", config.table_size);
    config.deck_size = parse_env_or("SET_DECK_SIZE", config.deck_size);
    config.feature_size = parse_env_or("SET_FEATURE_SIZE", config.feature_size);
    config.human_players = parse_env_or("SET_HUMAN_PLAYERS", config.human_players);
    config.computer_players = parse_env_or("SET_COMPUTER_PLAYERS", config.computer_players);
    config.turn_timeout_millis = parse_env_or("SET_TURN_TIMEOUT_MILLIS", config.turn_timeout_millis);
    config.turn_timeout_warning_millis = parse_env_or(
        "SET_TURN_TIMEOUT_WARNING_MILLIS",
        config.turn_timeout_warning_millis,
    );
    config.point_freeze_millis = parse_env_or("SET_POINT_FREEZE_MILLIS", config.point_freeze_millis);
    config.penalty_freeze_millis =
        parse_env_or("SET_PENALTY_FREEZE_MILLIS", config.penalty_freeze_millis);
    config.end_game_pause_millis =
        parse_env_or("SET_END_GAME_PAUSE_MILLIS", config.end_game_pause_millis);
    config.table_delay_millis = parse_env_or("SET_TABLE_DELAY_MILLIS", config.table_delay_millis);
    config.countdown_tick_millis =
        parse_env_or("SET_COUNTDOWN_TICK_MILLIS", config.countdown_tick_millis);
    config.hints = parse_env_or("SET_HINTS", config.hints);
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Invalid(#[from] set_engine::ConfigError),
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    parse_or(std::env::var(key).ok(), default)
}

fn parse_or<T>(value: Option<String>, default: T) -> T
where
    T: std::str::FromStr,
{
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}
