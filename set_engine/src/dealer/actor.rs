//! Dealer loop: dealing, countdown, reshuffling and the end of the game.

use rand::seq::SliceRandom;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::deck::Deck;
use super::handle::DealerHandle;
use super::state::{DealerPhase, wait_for_shutdown};
use crate::display::DisplayEvent;
use crate::game::GameSummary;
use crate::player::{PlayerActor, PlayerHandle};
use crate::table::{Card, PlayerId};
use crate::utils::millis;

/// Task driving the game.
///
/// Owns the deck and the player tasks. Cycles through
/// `Dealing -> Countdown -> Reshuffling` until the game is terminated or no
/// legal set remains, then announces the winners and shuts every player down.
pub struct DealerActor {
    handle: DealerHandle,
    deck: Deck,
    players: Vec<PlayerHandle>,
    actors: Vec<PlayerActor>,
}

impl DealerActor {
    /// Create the dealer and one player per configured seat. Humans take the
    /// lowest ids.
    pub fn new(handle: DealerHandle, deck: Deck) -> Self {
        let config = handle.config();
        let (players, actors): (Vec<_>, Vec<_>) = (0..config.players())
            .map(|id| PlayerActor::new(id, config.is_human(id), handle.clone()))
            .unzip();

        Self {
            handle,
            deck,
            players,
            actors,
        }
    }

    pub fn players(&self) -> &[PlayerHandle] {
        &self.players
    }

    pub async fn run(mut self) -> GameSummary {
        let config = self.handle.config();
        log::info!(
            "Dealer starting: {} humans, {} computers, {} cards",
            config.human_players,
            config.computer_players,
            self.deck.len()
        );

        let tasks: Vec<JoinHandle<()>> = std::mem::take(&mut self.actors)
            .into_iter()
            .map(|actor| tokio::spawn(actor.run()))
            .collect();
        let mut shutdown = self.handle.state().shutdown_signal();

        self.check_finished();
        while !self.handle.state().should_finish() {
            self.handle.state().set_phase(DealerPhase::Dealing);
            self.place_cards().await;
            self.countdown(&mut shutdown).await;
            self.reshuffle();
        }

        self.finish(tasks, &mut shutdown).await
    }

    /// Fill the empty slots in random order until the deck runs out
    async fn place_cards(&mut self) {
        let dealer = self.handle.clone();
        let (table, state, config) = (dealer.table(), dealer.state(), dealer.config());

        let mut empty = table.empty_slots();
        if empty.is_empty() || self.deck.is_empty() {
            return;
        }

        let was_empty = empty.len() == table.table_size();
        if was_empty {
            state.set_can_play(false);
        }

        empty.shuffle(&mut rand::rng());
        let mut placed = 0;
        for slot in empty {
            let Some(card) = self.deck.draw() else {
                break;
            };
            match table.place_card(card, slot).await {
                Ok(()) => placed += 1,
                Err(e) => {
                    log::error!("Failed to deal card {card} to slot {slot}: {e}");
                    self.deck.put_back(card);
                }
            }
        }
        log::debug!("Dealt {placed} cards, {} left in deck", self.deck.len());

        if was_empty {
            state.reset_deadline(config.turn_timeout());
            self.publish_countdown(config.turn_timeout());
            state.set_can_play(true);
        }

        if config.hints && placed > 0 {
            for hint in table.hints(dealer.validator()) {
                log::info!("Hint: {hint}");
            }
        }
    }

    /// Accept claims until the deadline passes, refilling the grid after
    /// every collected set
    async fn countdown(&mut self, shutdown: &mut watch::Receiver<bool>) {
        let dealer = self.handle.clone();
        let (state, config) = (dealer.state(), dealer.config());

        state.set_phase(DealerPhase::Countdown);
        state.set_can_play(true);

        loop {
            if state.should_finish() {
                break;
            }

            let left = state.time_left();
            self.publish_countdown(left);
            if left.is_zero() {
                break;
            }

            tokio::select! {
                _ = wait_for_shutdown(shutdown) => break,
                _ = dealer.wake().notified() => {}
                _ = tokio::time::sleep(left.min(config.countdown_tick())) => {}
            }

            self.place_cards().await;
            if self.deck.is_empty() && dealer.table().count_cards() == 0 {
                self.check_finished();
            }
        }

        state.set_can_play(false);
    }

    /// Return every grid card to the deck and shuffle it
    fn reshuffle(&mut self) {
        let dealer = self.handle.clone();
        let state = dealer.state();

        state.set_can_play(false);
        state.set_phase(DealerPhase::Reshuffling);
        self.publish_countdown(Duration::ZERO);

        let cards = dealer.table().lock().remove_all_cards();
        log::debug!("Reshuffling {} cards back into the deck", cards.len());
        self.deck.extend(cards);
        self.deck.shuffle();

        self.check_finished();
    }

    /// Mark the game finished when neither grid nor deck holds a legal set
    fn check_finished(&self) {
        let mut cards: Vec<Card> = self.handle.table().occupied_cards();
        cards.extend(self.deck.cards());

        let exhausted =
            cards.is_empty() || self.handle.validator().find_sets(&cards, 1).is_empty();
        if exhausted {
            log::info!("No legal set left among {} cards", cards.len());
            self.handle.state().mark_finished();
        }
    }

    async fn finish(
        self,
        tasks: Vec<JoinHandle<()>>,
        shutdown: &mut watch::Receiver<bool>,
    ) -> GameSummary {
        let dealer = &self.handle;
        let state = dealer.state();

        state.set_can_play(false);
        state.set_phase(DealerPhase::Ended);
        // Wait out an arbitration still inside the guarded section
        drop(dealer.table().lock());
        self.publish_countdown(Duration::ZERO);

        let scores: Vec<u32> = self.players.iter().map(PlayerHandle::score).collect();
        let winners = winners(&scores);
        dealer.display().notify(DisplayEvent::Winners(winners.clone()));
        log::info!("Game over, scores {scores:?}, winners {winners:?}");

        if !state.is_terminated() {
            tokio::select! {
                _ = wait_for_shutdown(shutdown) => {}
                _ = tokio::time::sleep(dealer.config().end_game_pause()) => {}
            }
        }

        state.request_terminate();
        for (id, task) in tasks.into_iter().enumerate().rev() {
            if let Err(e) = task.await {
                log::error!("Player {id} task failed: {e}");
            }
        }
        log::info!("Dealer stopped");

        GameSummary {
            scores,
            winners,
            finished: state.is_finished(),
        }
    }

    fn publish_countdown(&self, remaining: Duration) {
        let config = self.handle.config();
        self.handle.display().notify(DisplayEvent::Countdown {
            remaining_millis: millis(remaining),
            warn: !remaining.is_zero() && config.should_warn(remaining),
        });
    }
}

/// Every player holding the highest score
fn winners(scores: &[u32]) -> Vec<PlayerId> {
    let Some(&best) = scores.iter().max() else {
        return Vec::new();
    };
    scores
        .iter()
        .enumerate()
        .filter(|(_, score)| **score == best)
        .map(|(id, _)| id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winners_include_ties() {
        assert_eq!(winners(&[2, 5, 1, 5]), vec![1, 3]);
        assert_eq!(winners(&[0, 0]), vec![0, 1]);
        assert_eq!(winners(&[3]), vec![0]);
        assert!(winners(&[]).is_empty());
    }
}
