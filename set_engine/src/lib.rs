//! # Set Engine
//!
//! A concurrent engine for the real-time card-matching game "Set".
//!
//! A shared grid of card slots is watched by a pool of human and automated
//! players. Players claim slots by placing tokens; once a player's claim set
//! is full the dealer arbitrates it, removes the cards of a legal set and
//! awards a point. A countdown forces a reshuffle of the grid when nobody
//! finds a set in time, and the game ends once no legal set remains among
//! the grid and the deck.
//!
//! ## Architecture
//!
//! Every participant runs in its own Tokio task:
//!
//! - **Dealer**: runs the `Dealing -> Countdown -> Reshuffling` cycle, owns the
//!   countdown deadline and is the only entry point for claim arbitration
//! - **Player**: one task per participant consuming a bounded queue of slot
//!   requests, toggling claims and serving freezes
//! - **Generator**: one extra task per automated player producing random slot
//!   requests whenever its player's queue has room
//!
//! All structural mutations of the grid (placing and removing cards, toggling
//! claims, arbitration, reshuffles) go through a single lock owned by the
//! [`Table`].
//!
//! ## Core Modules
//!
//! - [`table`]: the shared grid and claim sets
//! - [`dealer`]: deck, game state flags, arbitration and the dealer loop
//! - [`player`]: player records, the player loop and the automated generator
//! - [`display`]: one-way notifications to a renderer
//! - [`rules`]: the injected legal-set capability
//!
//! ## Example
//!
//! ```no_run
//! use set_engine::{Game, GameConfig, display::LogDisplay, rules::RuleValidator};
//! use std::sync::Arc;
//!
//! struct AnyTriple;
//!
//! impl RuleValidator for AnyTriple {
//!     fn is_legal_set(&self, cards: &[usize]) -> bool {
//!         cards.len() == 3
//!     }
//!
//!     fn find_sets(&self, cards: &[usize], limit: usize) -> Vec<Vec<usize>> {
//!         set_engine::rules::enumerate_sets(cards, 3, limit, |group| self.is_legal_set(group))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = GameConfig::default();
//!     let mut game = Game::start(config, Arc::new(AnyTriple), Arc::new(LogDisplay)).unwrap();
//!     let summary = game.wait().await.unwrap();
//!     println!("winners: {:?}", summary.winners);
//! }
//! ```

pub mod config;
pub mod dealer;
pub mod display;
pub mod errors;
pub mod game;
pub mod player;
pub mod rules;
pub mod table;

mod utils;

pub use config::{ConfigError, GameConfig};
pub use dealer::{ClaimOutcome, DealerHandle, DealerPhase, Deck};
pub use display::{DisplayEvent, DisplayObserver};
pub use errors::{GameError, GameResult, TableError};
pub use game::{Game, GameSummary};
pub use player::PlayerHandle;
pub use rules::RuleValidator;
pub use table::{Card, ClaimToggle, Grid, Hint, PlayerId, Slot, Table};
