//! Engine error types.

use thiserror::Error;

use crate::config::ConfigError;
use crate::table::{Card, PlayerId, Slot};

/// Errors raised by structural table mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableError {
    /// Slot outside of the grid
    #[error("Slot {slot} out of range (table size {table_size})")]
    SlotOutOfRange { slot: Slot, table_size: usize },

    /// Card outside of the deck universe
    #[error("Card {card} out of range (deck size {deck_size})")]
    CardOutOfRange { card: Card, deck_size: usize },

    /// Slot already holds a card
    #[error("Slot {slot} already holds card {card}")]
    SlotOccupied { slot: Slot, card: Card },

    /// Card already lies in another slot
    #[error("Card {card} already placed in slot {slot}")]
    CardAlreadyPlaced { card: Card, slot: Slot },

    /// Card appears more than once in a deck
    #[error("Card {0} appears more than once in the deck")]
    DuplicateCard(Card),

    /// Player id without a claim set
    #[error("Player {0} does not exist")]
    UnknownPlayer(PlayerId),
}

/// Game errors
#[derive(Debug, Error)]
pub enum GameError {
    /// Configuration rejected before start
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Table mutation failed
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// Player id not part of this game
    #[error("Player {0} does not exist")]
    UnknownPlayer(PlayerId),

    /// Slot outside of the grid
    #[error("Slot {slot} out of range (table size {table_size})")]
    SlotOutOfRange { slot: Slot, table_size: usize },

    /// The game already ended
    #[error("Game is over")]
    GameOver,

    /// A game task panicked or was cancelled
    #[error("Game task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Result type for game operations
pub type GameResult<T> = Result<T, GameError>;
