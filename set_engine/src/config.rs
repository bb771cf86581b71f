//! Game configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::table::PlayerId;

/// Game configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of slots on the grid (default: 12)
    pub table_size: usize,

    /// Number of distinct cards (default: 81)
    pub deck_size: usize,

    /// Number of cards forming one legal set (default: 3)
    pub feature_size: usize,

    /// Number of human players. Humans take the lowest player ids.
    pub human_players: usize,

    /// Number of automated players
    pub computer_players: usize,

    /// Time until the grid is reshuffled when no set is found
    pub turn_timeout_millis: u64,

    /// The countdown is displayed with a warning below this threshold
    pub turn_timeout_warning_millis: u64,

    /// Freeze after a valid set
    pub point_freeze_millis: u64,

    /// Freeze after an invalid set
    pub penalty_freeze_millis: u64,

    /// How long the winners stay on display before shutdown
    pub end_game_pause_millis: u64,

    /// Pacing delay before each card placement
    pub table_delay_millis: u64,

    /// Interval between countdown updates
    pub countdown_tick_millis: u64,

    /// Log every legal set on the grid after each deal
    pub hints: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            table_size: 12,
            deck_size: 81,
            feature_size: 3,
            human_players: 0,
            computer_players: 2,
            turn_timeout_millis: 60_000,
            turn_timeout_warning_millis: 5_000,
            point_freeze_millis: 1_000,
            penalty_freeze_millis: 3_000,
            end_game_pause_millis: 5_000,
            table_delay_millis: 10,
            countdown_tick_millis: 100,
            hints: false,
        }
    }
}

impl GameConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feature_size == 0 {
            return Err(ConfigError::invalid("feature_size", "must be greater than 0"));
        }

        if self.table_size < self.feature_size {
            return Err(ConfigError::invalid(
                "table_size",
                format!("must hold at least one set ({} cards)", self.feature_size),
            ));
        }

        if self.deck_size < self.table_size {
            return Err(ConfigError::invalid(
                "deck_size",
                format!("must be at least the table size ({})", self.table_size),
            ));
        }

        if self.players() == 0 {
            return Err(ConfigError::invalid(
                "human_players",
                "at least one human or computer player is required",
            ));
        }

        if self.turn_timeout_millis == 0 {
            return Err(ConfigError::invalid("turn_timeout_millis", "must be greater than 0"));
        }

        if self.countdown_tick_millis == 0 {
            return Err(ConfigError::invalid(
                "countdown_tick_millis",
                "must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Total number of players
    pub fn players(&self) -> usize {
        self.human_players + self.computer_players
    }

    /// Whether the given player id belongs to a human
    pub fn is_human(&self, player: PlayerId) -> bool {
        player < self.human_players
    }

    pub fn turn_timeout(&self) -> Duration {
        Duration::from_millis(self.turn_timeout_millis)
    }

    pub fn turn_timeout_warning(&self) -> Duration {
        Duration::from_millis(self.turn_timeout_warning_millis)
    }

    pub fn point_freeze(&self) -> Duration {
        Duration::from_millis(self.point_freeze_millis)
    }

    pub fn penalty_freeze(&self) -> Duration {
        Duration::from_millis(self.penalty_freeze_millis)
    }

    pub fn end_game_pause(&self) -> Duration {
        Duration::from_millis(self.end_game_pause_millis)
    }

    pub fn table_delay(&self) -> Duration {
        Duration::from_millis(self.table_delay_millis)
    }

    pub fn countdown_tick(&self) -> Duration {
        Duration::from_millis(self.countdown_tick_millis)
    }

    /// Whether a countdown value should be displayed as a warning
    pub fn should_warn(&self, remaining: Duration) -> bool {
        remaining < self.turn_timeout_warning()
    }
}

/// Configuration error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
