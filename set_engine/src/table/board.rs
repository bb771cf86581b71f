//! The grid behind the structural lock.

use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::grid::{Card, ClaimToggle, Grid, PlayerId, Slot};
use crate::config::GameConfig;
use crate::display::{DisplayEvent, DisplayObserver};
use crate::errors::TableError;
use crate::rules::RuleValidator;
use crate::utils::lock;

/// A legal set currently on the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hint {
    /// Slots holding the set, ascending
    pub slots: Vec<Slot>,
    pub cards: Vec<Card>,
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "set found at slots {:?} (cards {:?})", self.slots, self.cards)
    }
}

/// Shared table: the grid plus the lock serializing every structural
/// mutation.
///
/// Only the dealer places and removes cards. Players toggle their own
/// claims. Every mutation notifies the display while the lock is still
/// held, so the display sees mutations in commit order.
pub struct Table {
    grid: Mutex<Grid>,
    display: Arc<dyn DisplayObserver>,
    table_delay: Duration,
}

impl Table {
    pub fn new(config: &GameConfig, display: Arc<dyn DisplayObserver>) -> Self {
        Self {
            grid: Mutex::new(Grid::new(
                config.table_size,
                config.deck_size,
                config.players(),
                config.feature_size,
            )),
            display,
            table_delay: config.table_delay(),
        }
    }

    /// Enter the guarded section
    pub(crate) fn lock(&self) -> TableGuard<'_> {
        TableGuard {
            grid: lock(&self.grid),
            display: self.display.as_ref(),
        }
    }

    /// Place a card in an empty slot after the pacing delay
    pub async fn place_card(&self, card: Card, slot: Slot) -> Result<(), TableError> {
        if !self.table_delay.is_zero() {
            tokio::time::sleep(self.table_delay).await;
        }
        self.lock().place_card(card, slot)
    }

    /// Remove the card in a slot, releasing every claim on it.
    /// Returns `Ok(None)` when the slot was already empty.
    pub fn remove_card(&self, slot: Slot) -> Result<Option<Card>, TableError> {
        let mut table = self.lock();
        let table_size = table.grid().table_size();
        if slot >= table_size {
            return Err(TableError::SlotOutOfRange { slot, table_size });
        }
        Ok(table.remove_card(slot))
    }

    pub fn toggle_claim(&self, player: PlayerId, slot: Slot) -> Result<ClaimToggle, TableError> {
        self.lock().toggle_claim(player, slot)
    }

    /// Withdraw one claim; `false` when the player had no claim on the slot
    pub fn remove_claim(&self, player: PlayerId, slot: Slot) -> Result<bool, TableError> {
        self.lock().remove_claim(player, slot)
    }

    pub fn clear_claims(&self, player: PlayerId) -> Result<Vec<Slot>, TableError> {
        self.lock().clear_claims(player)
    }

    /// Every legal set among the cards on the grid
    pub fn hints(&self, validator: &dyn RuleValidator) -> Vec<Hint> {
        let table = self.lock();
        let grid = table.grid();
        let cards = grid.occupied_cards();
        if cards.is_empty() {
            return Vec::new();
        }

        validator
            .find_sets(&cards, usize::MAX)
            .into_iter()
            .map(|cards| {
                let mut slots: Vec<Slot> = cards.iter().filter_map(|&c| grid.slot_of(c)).collect();
                slots.sort_unstable();
                Hint { slots, cards }
            })
            .collect()
    }

    /// Copy of the whole grid
    pub fn snapshot(&self) -> Grid {
        self.lock().grid().clone()
    }

    pub fn table_size(&self) -> usize {
        self.lock().grid().table_size()
    }

    pub fn card_at(&self, slot: Slot) -> Option<Card> {
        self.lock().grid().card_at(slot)
    }

    pub fn slot_of(&self, card: Card) -> Option<Slot> {
        self.lock().grid().slot_of(card)
    }

    pub fn empty_slots(&self) -> Vec<Slot> {
        self.lock().grid().empty_slots()
    }

    pub fn occupied_cards(&self) -> Vec<Card> {
        self.lock().grid().occupied_cards()
    }

    pub fn count_cards(&self) -> usize {
        self.lock().grid().count_cards()
    }

    pub fn claims_of(&self, player: PlayerId) -> Vec<Slot> {
        self.lock()
            .grid()
            .claims(player)
            .map(<[Slot]>::to_vec)
            .unwrap_or_default()
    }
}

/// Exclusive access to the grid. Mutations notify the display.
pub(crate) struct TableGuard<'a> {
    grid: MutexGuard<'a, Grid>,
    display: &'a dyn DisplayObserver,
}

impl TableGuard<'_> {
    pub(crate) fn grid(&self) -> &Grid {
        &self.grid
    }

    pub(crate) fn place_card(&mut self, card: Card, slot: Slot) -> Result<(), TableError> {
        self.grid.place(card, slot)?;
        self.display.notify(DisplayEvent::CardPlaced { card, slot });
        debug_assert!(self.grid.is_consistent());
        Ok(())
    }

    pub(crate) fn remove_card(&mut self, slot: Slot) -> Option<Card> {
        let (card, released) = self.grid.remove(slot)?;
        self.display.notify(DisplayEvent::CardRemoved { slot });
        for player in released {
            self.display
                .notify(DisplayEvent::ClaimRemoved { player, slot });
        }
        debug_assert!(self.grid.is_consistent());
        Some(card)
    }

    /// Empty the whole grid, returning the cards in slot order
    pub(crate) fn remove_all_cards(&mut self) -> Vec<Card> {
        self.grid
            .occupied_slots()
            .into_iter()
            .filter_map(|slot| self.remove_card(slot))
            .collect()
    }

    pub(crate) fn toggle_claim(
        &mut self,
        player: PlayerId,
        slot: Slot,
    ) -> Result<ClaimToggle, TableError> {
        let toggle = self.grid.toggle(player, slot)?;
        match toggle {
            ClaimToggle::Placed { .. } => {
                self.display
                    .notify(DisplayEvent::ClaimPlaced { player, slot });
            }
            ClaimToggle::Removed => {
                self.display
                    .notify(DisplayEvent::ClaimRemoved { player, slot });
            }
            ClaimToggle::Ignored => {}
        }
        Ok(toggle)
    }

    pub(crate) fn remove_claim(&mut self, player: PlayerId, slot: Slot) -> Result<bool, TableError> {
        let removed = self.grid.unclaim(player, slot)?;
        if removed {
            self.display
                .notify(DisplayEvent::ClaimRemoved { player, slot });
        }
        Ok(removed)
    }

    pub(crate) fn clear_claims(&mut self, player: PlayerId) -> Result<Vec<Slot>, TableError> {
        let released = self.grid.clear_claims(player)?;
        for &slot in &released {
            self.display
                .notify(DisplayEvent::ClaimRemoved { player, slot });
        }
        Ok(released)
    }
}
