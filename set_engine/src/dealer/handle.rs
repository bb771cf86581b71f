//! Shared dealer handle: claim arbitration and termination requests.

use std::sync::Arc;
use tokio::sync::Notify;

use super::state::GameState;
use crate::config::GameConfig;
use crate::display::{DisplayEvent, DisplayObserver};
use crate::rules::RuleValidator;
use crate::player::PlayerHandle;
use crate::table::{Card, Slot, Table};
use crate::utils::millis;

/// Result of arbitrating a full claim set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// Legal set; its cards left the table
    Valid,
    /// Not a legal set; claims stay as they are
    Invalid,
    /// The claim set changed before arbitration ran, or play is paused
    NotReady,
}

/// Dealer handle shared by the dealer loop and every player task
#[derive(Clone)]
pub struct DealerHandle {
    inner: Arc<Shared>,
}

struct Shared {
    config: GameConfig,
    table: Arc<Table>,
    validator: Arc<dyn RuleValidator>,
    display: Arc<dyn DisplayObserver>,
    state: GameState,
    /// Wakes the dealer loop after cards left the table
    wake: Notify,
}

impl DealerHandle {
    pub fn new(
        config: GameConfig,
        table: Arc<Table>,
        validator: Arc<dyn RuleValidator>,
        display: Arc<dyn DisplayObserver>,
    ) -> Self {
        Self {
            inner: Arc::new(Shared {
                config,
                table,
                validator,
                display,
                state: GameState::new(),
                wake: Notify::new(),
            }),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.inner.config
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.inner.table
    }

    pub fn state(&self) -> &GameState {
        &self.inner.state
    }

    pub(crate) fn validator(&self) -> &dyn RuleValidator {
        self.inner.validator.as_ref()
    }

    pub(crate) fn display(&self) -> &dyn DisplayObserver {
        self.inner.display.as_ref()
    }

    pub(crate) fn wake(&self) -> &Notify {
        &self.inner.wake
    }

    /// Ask the dealer to end the game
    pub fn terminate(&self) {
        log::info!("Termination requested");
        self.inner.state.request_terminate();
        self.inner.wake.notify_one();
    }

    /// Arbitrate the player's claim set.
    ///
    /// Runs entirely inside the table's guarded section, so at most one
    /// arbitration proceeds at a time and none interleaves with a removal or
    /// reshuffle. When two players claimed overlapping cards, the first
    /// arbitration consumes them and releases the other player's claims, so
    /// the second sees a short claim set and gets `NotReady`.
    ///
    /// A legal set earns the player a point before the section ends. Play is
    /// checked inside the section, so once the dealer closed play and took the
    /// lock no further point can be awarded.
    pub fn resolve_claim(&self, player: &PlayerHandle) -> ClaimOutcome {
        let id = player.id();
        let state = self.state();
        let feature_size = self.config().feature_size;

        let (cards, score) = {
            let mut table = self.table().lock();
            if !state.can_play() {
                return ClaimOutcome::NotReady;
            }

            let slots: Vec<Slot> = match table.grid().claims(id) {
                Some(slots) if slots.len() == feature_size => slots.to_vec(),
                _ => return ClaimOutcome::NotReady,
            };

            let cards: Option<Vec<Card>> =
                slots.iter().map(|&slot| table.grid().card_at(slot)).collect();
            let Some(cards) = cards else {
                return ClaimOutcome::NotReady;
            };

            if !self.validator().is_legal_set(&cards) {
                log::debug!("Player {id} claimed an illegal set {cards:?}");
                return ClaimOutcome::Invalid;
            }

            for slot in slots {
                table.remove_card(slot);
            }

            let score = player.award_point();
            self.display()
                .notify(DisplayEvent::ScoreChanged { player: id, score });
            (cards, score)
        };

        log::debug!("Player {id} found set {cards:?}, score {score}");

        let timeout = self.config().turn_timeout();
        state.reset_deadline(timeout);
        self.display().notify(DisplayEvent::Countdown {
            remaining_millis: millis(timeout),
            warn: self.config().should_warn(timeout),
        });
        self.wake().notify_one();

        ClaimOutcome::Valid
    }
}
