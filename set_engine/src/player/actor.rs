//! Player control loop.

use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use super::generator::Generator;
use super::models::PlayerHandle;
use crate::dealer::state::{wait_for_shutdown, wait_until_open};
use crate::dealer::{ClaimOutcome, DealerHandle};
use crate::display::DisplayEvent;
use crate::table::{PlayerId, Slot};
use crate::utils::millis;

/// Freeze countdown granularity
const FREEZE_STEP: Duration = Duration::from_secs(1);

/// Task consuming one player's slot requests.
///
/// Requests are only taken off the queue while play is open and the player
/// is not frozen, so presses made during a freeze wait in the queue.
pub struct PlayerActor {
    handle: PlayerHandle,
    requests: mpsc::Receiver<Slot>,
    dealer: DealerHandle,
    generator: Option<Generator>,
}

impl PlayerActor {
    /// Create a player and its task. Automated players get a generator that
    /// feeds their queue.
    pub fn new(id: PlayerId, human: bool, dealer: DealerHandle) -> (PlayerHandle, Self) {
        let (sender, requests) = mpsc::channel(dealer.config().feature_size);

        let generator = (!human).then(|| {
            let state = dealer.state();
            Generator::new(
                id,
                sender.clone(),
                dealer.config().table_size,
                state.play_gate(),
                state.shutdown_signal(),
            )
        });

        let handle = PlayerHandle::new(id, human, sender);
        let actor = Self {
            handle: handle.clone(),
            requests,
            dealer,
            generator,
        };
        (handle, actor)
    }

    pub async fn run(mut self) {
        let id = self.handle.id();
        let kind = if self.handle.is_human() { "human" } else { "computer" };
        log::info!("Player {id} ({kind}) starting");

        let generator = self.generator.take().map(|g| tokio::spawn(g.run()));
        let mut shutdown = self.dealer.state().shutdown_signal();
        let mut gate = self.dealer.state().play_gate();

        loop {
            if *shutdown.borrow() {
                break;
            }

            let open = tokio::select! {
                _ = wait_for_shutdown(&mut shutdown) => break,
                open = wait_until_open(&mut gate) => open,
            };
            if !open {
                break;
            }

            let request = tokio::select! {
                _ = wait_for_shutdown(&mut shutdown) => break,
                request = self.requests.recv() => request,
            };
            let Some(slot) = request else {
                break;
            };
            // Play may have closed while this task waited on the queue
            if !*gate.borrow() {
                log::trace!("Player {id} dropped press on slot {slot} while play is closed");
                continue;
            }

            self.handle_request(slot, &mut shutdown).await;
        }

        // Unblocks a generator waiting for queue capacity
        self.requests.close();
        if let Some(generator) = generator {
            if let Err(e) = generator.await {
                log::error!("Generator for player {id} failed: {e}");
            }
        }

        log::info!("Player {id} stopped with score {}", self.handle.score());
    }

    async fn handle_request(&self, slot: Slot, shutdown: &mut watch::Receiver<bool>) {
        let id = self.handle.id();
        let toggle = match self.dealer.table().toggle_claim(id, slot) {
            Ok(toggle) => toggle,
            Err(e) => {
                log::error!("Player {id} failed to toggle slot {slot}: {e}");
                return;
            }
        };

        if !toggle.is_full() || self.dealer.state().is_terminated() {
            return;
        }

        let config = self.dealer.config();
        match self.dealer.resolve_claim(&self.handle) {
            ClaimOutcome::Valid => {
                log::debug!("Player {id} scored, now at {}", self.handle.score());
                self.freeze(config.point_freeze(), shutdown).await;
            }
            ClaimOutcome::Invalid => {
                log::debug!("Player {id} penalized");
                self.freeze(config.penalty_freeze(), shutdown).await;
            }
            ClaimOutcome::NotReady => {
                log::trace!("Player {id} claim no longer ready");
            }
        }
    }

    /// Sit out `duration`, publishing the remaining time. Cut short by
    /// shutdown.
    async fn freeze(&self, duration: Duration, shutdown: &mut watch::Receiver<bool>) {
        let id = self.handle.id();
        let display = self.dealer.display();
        let until = Instant::now() + duration;
        self.handle.set_frozen_until(Some(until));

        loop {
            let remaining = until.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }

            display.notify(DisplayEvent::FreezeChanged {
                player: id,
                remaining_millis: millis(remaining),
            });

            tokio::select! {
                _ = wait_for_shutdown(shutdown) => break,
                _ = tokio::time::sleep(remaining.min(FREEZE_STEP)) => {}
            }
        }

        self.handle.set_frozen_until(None);
        display.notify(DisplayEvent::FreezeChanged {
            player: id,
            remaining_millis: 0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::display::EventFeed;
    use crate::rules::RuleValidator;
    use crate::table::{Card, Table};
    use std::sync::Arc;

    struct AnyTriple;

    impl RuleValidator for AnyTriple {
        fn is_legal_set(&self, cards: &[Card]) -> bool {
            cards.len() == 3
        }

        fn find_sets(&self, cards: &[Card], limit: usize) -> Vec<Vec<Card>> {
            crate::rules::enumerate_sets(cards, 3, limit, |group| self.is_legal_set(group))
        }
    }

    struct NoSets;

    impl RuleValidator for NoSets {
        fn is_legal_set(&self, _cards: &[Card]) -> bool {
            false
        }

        fn find_sets(&self, _cards: &[Card], _limit: usize) -> Vec<Vec<Card>> {
            Vec::new()
        }
    }

    fn dealer(validator: Arc<dyn RuleValidator>) -> (DealerHandle, mpsc::Receiver<DisplayEvent>) {
        let feed = Arc::new(EventFeed::new());
        let events = feed.subscribe(1024);
        let config = GameConfig {
            human_players: 1,
            computer_players: 0,
            table_delay_millis: 0,
            point_freeze_millis: 1_000,
            penalty_freeze_millis: 2_500,
            ..GameConfig::default()
        };
        let table = Arc::new(Table::new(&config, feed.clone()));
        {
            let mut guard = table.lock();
            for slot in 0..config.table_size {
                guard.place_card(slot, slot).unwrap();
            }
        }
        let dealer = DealerHandle::new(config, table, validator, feed);
        dealer.state().set_can_play(true);
        (dealer, events)
    }

    fn drain(events: &mut mpsc::Receiver<DisplayEvent>) -> Vec<DisplayEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = events.try_recv() {
            drained.push(event);
        }
        drained
    }

    fn freezes(events: &[DisplayEvent]) -> Vec<u64> {
        events
            .iter()
            .filter_map(|e| match e {
                DisplayEvent::FreezeChanged {
                    remaining_millis, ..
                } => Some(*remaining_millis),
                _ => None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_valid_claim_scores_and_freezes() {
        let (dealer, mut events) = dealer(Arc::new(AnyTriple));
        let (player, actor) = PlayerActor::new(0, true, dealer.clone());
        let task = tokio::spawn(actor.run());

        assert!(player.key_pressed(0));
        assert!(player.key_pressed(1));
        assert!(player.key_pressed(2));
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(player.score(), 1);
        assert!(player.is_frozen());
        assert_eq!(dealer.table().empty_slots(), vec![0, 1, 2]);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!player.is_frozen());

        let events = drain(&mut events);
        assert!(events.contains(&DisplayEvent::ScoreChanged { player: 0, score: 1 }));
        assert_eq!(freezes(&events), vec![1_000, 0]);

        dealer.terminate();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_claim_penalizes() {
        let (dealer, mut events) = dealer(Arc::new(NoSets));
        let (player, actor) = PlayerActor::new(0, true, dealer.clone());
        let task = tokio::spawn(actor.run());

        for slot in [4, 5, 6] {
            assert!(player.key_pressed(slot));
        }
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(player.score(), 0);
        assert!(player.is_frozen());
        assert_eq!(dealer.table().claims_of(0), vec![4, 5, 6]);

        // Presses made while frozen wait in the queue
        assert!(player.key_pressed(6));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(player.queued(), 1);
        assert_eq!(dealer.table().claims_of(0), vec![4, 5, 6]);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!player.is_frozen());
        assert_eq!(player.queued(), 0);
        assert_eq!(dealer.table().claims_of(0), vec![4, 5]);

        let events = drain(&mut events);
        assert_eq!(freezes(&events), vec![2_500, 1_500, 500, 0]);

        dealer.terminate();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_freeze() {
        let (dealer, _events) = dealer(Arc::new(NoSets));
        let (player, actor) = PlayerActor::new(0, true, dealer.clone());
        let task = tokio::spawn(actor.run());

        for slot in [0, 1, 2] {
            player.key_pressed(slot);
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(player.is_frozen());

        let start = Instant::now();
        dealer.terminate();
        task.await.unwrap();
        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(!player.is_frozen());
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_wait_for_open_play() {
        let (dealer, _events) = dealer(Arc::new(AnyTriple));
        dealer.state().set_can_play(false);
        let (player, actor) = PlayerActor::new(0, true, dealer.clone());
        let task = tokio::spawn(actor.run());

        player.key_pressed(3);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(dealer.table().claims_of(0).is_empty());

        dealer.state().set_can_play(true);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(dealer.table().claims_of(0), vec![3]);

        dealer.terminate();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_received_while_closed_are_dropped() {
        let (dealer, _events) = dealer(Arc::new(AnyTriple));
        let (player, actor) = PlayerActor::new(0, true, dealer.clone());
        let task = tokio::spawn(actor.run());

        // Already past the gate and waiting on an empty queue
        tokio::time::sleep(Duration::from_millis(10)).await;
        dealer.state().set_can_play(false);
        assert!(player.key_pressed(3));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(player.queued(), 0);
        assert!(dealer.table().claims_of(0).is_empty());

        dealer.state().set_can_play(true);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(dealer.table().claims_of(0).is_empty());

        assert!(player.key_pressed(4));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(dealer.table().claims_of(0), vec![4]);

        dealer.terminate();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_computer_player_joins_generator() {
        let (dealer, _events) = dealer(Arc::new(NoSets));
        let (player, actor) = PlayerActor::new(0, false, dealer.clone());
        assert!(!player.is_human());
        let task = tokio::spawn(actor.run());

        tokio::time::sleep(Duration::from_secs(10)).await;
        dealer.terminate();
        task.await.unwrap();
        assert_eq!(player.score(), 0);
    }
}
