//! Game facade: starts the dealer and routes outside input to players.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::GameConfig;
use crate::dealer::{DealerActor, DealerHandle, DealerPhase, Deck};
use crate::display::DisplayObserver;
use crate::errors::{GameError, GameResult, TableError};
use crate::player::PlayerHandle;
use crate::rules::RuleValidator;
use crate::table::{PlayerId, Slot, Table};

/// Final outcome of a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    /// Score per player id
    pub scores: Vec<u32>,
    /// Every player holding the highest score
    pub winners: Vec<PlayerId>,
    /// `true` when the game ran out of legal sets, `false` when it was
    /// terminated early
    pub finished: bool,
}

/// A running game.
///
/// Dropping a `Game` does not stop it; call [`Game::terminate`] and then
/// [`Game::wait`].
pub struct Game {
    dealer: DealerHandle,
    players: Vec<PlayerHandle>,
    task: Option<JoinHandle<GameSummary>>,
}

impl Game {
    /// Validate the configuration and spawn the dealer with a shuffled deck.
    /// Must be called from within a Tokio runtime.
    pub fn start(
        config: GameConfig,
        validator: Arc<dyn RuleValidator>,
        display: Arc<dyn DisplayObserver>,
    ) -> GameResult<Self> {
        let deck = Deck::new(config.deck_size);
        Self::start_with_deck(config, deck, validator, display)
    }

    /// Like [`Game::start`], dealing from the given deck in order
    pub fn start_with_deck(
        config: GameConfig,
        deck: Deck,
        validator: Arc<dyn RuleValidator>,
        display: Arc<dyn DisplayObserver>,
    ) -> GameResult<Self> {
        config.validate()?;
        if let Some(card) = deck.cards().find(|&card| card >= config.deck_size) {
            return Err(TableError::CardOutOfRange {
                card,
                deck_size: config.deck_size,
            }
            .into());
        }
        let mut seen = HashSet::new();
        if let Some(card) = deck.cards().find(|&card| !seen.insert(card)) {
            return Err(TableError::DuplicateCard(card).into());
        }

        let table = Arc::new(Table::new(&config, display.clone()));
        let dealer = DealerHandle::new(config, table, validator, display);
        let actor = DealerActor::new(dealer.clone(), deck);
        let players = actor.players().to_vec();

        log::info!("Starting game with {} players", players.len());
        let task = tokio::spawn(actor.run());

        Ok(Self {
            dealer,
            players,
            task: Some(task),
        })
    }

    /// Queue a key press for a player.
    ///
    /// Returns `Ok(false)` when the press was dropped because play is paused
    /// or the player's queue is full.
    pub fn key_pressed(&self, player: PlayerId, slot: Slot) -> GameResult<bool> {
        let state = self.dealer.state();
        if state.should_finish() || state.phase() == DealerPhase::Ended {
            return Err(GameError::GameOver);
        }

        let handle = self
            .players
            .get(player)
            .ok_or(GameError::UnknownPlayer(player))?;

        let table_size = self.dealer.config().table_size;
        if slot >= table_size {
            return Err(GameError::SlotOutOfRange { slot, table_size });
        }

        if !state.can_play() {
            return Ok(false);
        }
        Ok(handle.key_pressed(slot))
    }

    pub fn players(&self) -> &[PlayerHandle] {
        &self.players
    }

    pub fn scores(&self) -> Vec<u32> {
        self.players.iter().map(PlayerHandle::score).collect()
    }

    pub fn phase(&self) -> DealerPhase {
        self.dealer.state().phase()
    }

    pub fn table(&self) -> &Arc<Table> {
        self.dealer.table()
    }

    pub fn dealer(&self) -> &DealerHandle {
        &self.dealer
    }

    /// Ask the dealer to end the game. Winners are still announced.
    pub fn terminate(&self) {
        self.dealer.terminate();
    }

    /// Wait for the dealer to shut everything down
    pub async fn wait(&mut self) -> GameResult<GameSummary> {
        let task = self.task.take().ok_or(GameError::GameOver)?;
        Ok(task.await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::LogDisplay;
    use crate::table::Card;

    struct NoSets;

    impl RuleValidator for NoSets {
        fn is_legal_set(&self, _cards: &[Card]) -> bool {
            false
        }

        fn find_sets(&self, _cards: &[Card], _limit: usize) -> Vec<Vec<Card>> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn test_start_rejects_invalid_config() {
        let config = GameConfig {
            feature_size: 0,
            ..GameConfig::default()
        };
        let result = Game::start(config, Arc::new(NoSets), Arc::new(LogDisplay));
        assert!(matches!(result, Err(GameError::Config(_))));
    }

    #[tokio::test]
    async fn test_start_rejects_foreign_cards() {
        let config = GameConfig {
            deck_size: 12,
            ..GameConfig::default()
        };
        let deck = Deck::from_cards(vec![0, 1, 40]);
        let result = Game::start_with_deck(config, deck, Arc::new(NoSets), Arc::new(LogDisplay));
        assert!(matches!(result, Err(GameError::Table(_))));
    }

    #[tokio::test]
    async fn test_start_rejects_duplicate_cards() {
        let config = GameConfig {
            human_players: 1,
            computer_players: 0,
            ..GameConfig::default()
        };
        let deck = Deck::from_cards(vec![0; 12]);
        let result = Game::start_with_deck(config, deck, Arc::new(NoSets), Arc::new(LogDisplay));
        assert!(matches!(
            result,
            Err(GameError::Table(TableError::DuplicateCard(0)))
        ));

        let deck = Deck::from_cards(vec![4, 7, 9, 7]);
        let result = Game::start_with_deck(
            GameConfig::default(),
            deck,
            Arc::new(NoSets),
            Arc::new(LogDisplay),
        );
        assert!(matches!(
            result,
            Err(GameError::Table(TableError::DuplicateCard(7)))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_game_without_sets_ends_immediately() {
        let config = GameConfig {
            human_players: 1,
            computer_players: 0,
            ..GameConfig::default()
        };
        let mut game = Game::start(config, Arc::new(NoSets), Arc::new(LogDisplay)).unwrap();

        assert!(matches!(
            game.key_pressed(3, 0),
            Err(GameError::UnknownPlayer(3)) | Err(GameError::GameOver)
        ));

        let summary = game.wait().await.unwrap();
        assert!(summary.finished);
        assert_eq!(summary.scores, vec![0]);
        assert_eq!(summary.winners, vec![0]);
        assert_eq!(game.phase(), DealerPhase::Ended);

        assert!(matches!(game.key_pressed(0, 0), Err(GameError::GameOver)));
        assert!(matches!(game.wait().await, Err(GameError::GameOver)));
    }
}
