//! Slot <-> card mapping and claim sets, without any locking.

use crate::errors::TableError;

/// Card identifier in `[0, deck_size)`
pub type Card = usize;

/// Grid position in `[0, table_size)`
pub type Slot = usize;

/// Player identifier in `[0, players)`
pub type PlayerId = usize;

/// Result of toggling a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimToggle {
    /// A claim was placed; `full` when the claim set reached the feature size
    Placed { full: bool },
    /// An existing claim was withdrawn
    Removed,
    /// Nothing changed: empty or unknown slot, or no spare capacity
    Ignored,
}

impl ClaimToggle {
    /// Whether the slot is claimed after the toggle
    pub fn is_claimed(&self) -> bool {
        matches!(self, ClaimToggle::Placed { .. })
    }

    /// Whether the toggle completed the claim set
    pub fn is_full(&self) -> bool {
        matches!(self, ClaimToggle::Placed { full: true })
    }
}

/// The grid: which card lies in which slot and which slots each player
/// claimed.
///
/// Invariants, restored by every method before it returns:
/// - `card_at(s) == Some(c)` iff `slot_of(c) == Some(s)`
/// - every claim set holds at most `feature_size` distinct slots
/// - every claimed slot holds a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    slot_to_card: Vec<Option<Card>>,
    card_to_slot: Vec<Option<Slot>>,
    /// Claimed slots per player, in claim order
    claims: Vec<Vec<Slot>>,
    feature_size: usize,
}

impl Grid {
    pub fn new(table_size: usize, deck_size: usize, players: usize, feature_size: usize) -> Self {
        Self {
            slot_to_card: vec![None; table_size],
            card_to_slot: vec![None; deck_size],
            claims: (0..players)
                .map(|_| Vec::with_capacity(feature_size))
                .collect(),
            feature_size,
        }
    }

    pub fn table_size(&self) -> usize {
        self.slot_to_card.len()
    }

    pub fn deck_size(&self) -> usize {
        self.card_to_slot.len()
    }

    pub fn players(&self) -> usize {
        self.claims.len()
    }

    pub fn feature_size(&self) -> usize {
        self.feature_size
    }

    pub fn card_at(&self, slot: Slot) -> Option<Card> {
        self.slot_to_card.get(slot).copied().flatten()
    }

    pub fn slot_of(&self, card: Card) -> Option<Slot> {
        self.card_to_slot.get(card).copied().flatten()
    }

    pub fn empty_slots(&self) -> Vec<Slot> {
        (0..self.table_size())
            .filter(|&slot| self.slot_to_card[slot].is_none())
            .collect()
    }

    pub fn occupied_slots(&self) -> Vec<Slot> {
        (0..self.table_size())
            .filter(|&slot| self.slot_to_card[slot].is_some())
            .collect()
    }

    /// Cards on the grid, in slot order
    pub fn occupied_cards(&self) -> Vec<Card> {
        self.slot_to_card.iter().flatten().copied().collect()
    }

    pub fn count_cards(&self) -> usize {
        self.slot_to_card.iter().flatten().count()
    }

    /// Slots claimed by a player, `None` for an unknown player
    pub fn claims(&self, player: PlayerId) -> Option<&[Slot]> {
        self.claims.get(player).map(Vec::as_slice)
    }

    /// Put a card into an empty slot
    pub fn place(&mut self, card: Card, slot: Slot) -> Result<(), TableError> {
        if slot >= self.table_size() {
            return Err(TableError::SlotOutOfRange {
                slot,
                table_size: self.table_size(),
            });
        }
        if card >= self.deck_size() {
            return Err(TableError::CardOutOfRange {
                card,
                deck_size: self.deck_size(),
            });
        }
        if let Some(existing) = self.slot_to_card[slot] {
            return Err(TableError::SlotOccupied {
                slot,
                card: existing,
            });
        }
        if let Some(current) = self.card_to_slot[card] {
            return Err(TableError::CardAlreadyPlaced {
                card,
                slot: current,
            });
        }

        self.slot_to_card[slot] = Some(card);
        self.card_to_slot[card] = Some(slot);
        Ok(())
    }

    /// Take the card out of a slot and release every claim on it.
    ///
    /// Returns the card and the players whose claim was released, or `None`
    /// when the slot is empty or out of range.
    pub fn remove(&mut self, slot: Slot) -> Option<(Card, Vec<PlayerId>)> {
        let card = self.slot_to_card.get_mut(slot)?.take()?;
        self.card_to_slot[card] = None;

        let mut released = Vec::new();
        for (player, claimed) in self.claims.iter_mut().enumerate() {
            if let Some(pos) = claimed.iter().position(|&s| s == slot) {
                claimed.remove(pos);
                released.push(player);
            }
        }

        Some((card, released))
    }

    /// Withdraw the claim on `slot` if the player has one, otherwise claim it
    /// when it holds a card and the claim set has room.
    pub fn toggle(&mut self, player: PlayerId, slot: Slot) -> Result<ClaimToggle, TableError> {
        let has_card = self.card_at(slot).is_some();
        let feature_size = self.feature_size;
        let claimed = self
            .claims
            .get_mut(player)
            .ok_or(TableError::UnknownPlayer(player))?;

        if let Some(pos) = claimed.iter().position(|&s| s == slot) {
            claimed.remove(pos);
            return Ok(ClaimToggle::Removed);
        }

        if !has_card || claimed.len() >= feature_size {
            return Ok(ClaimToggle::Ignored);
        }

        claimed.push(slot);
        Ok(ClaimToggle::Placed {
            full: claimed.len() == feature_size,
        })
    }

    /// Withdraw a single claim; `false` when there was none
    pub fn unclaim(&mut self, player: PlayerId, slot: Slot) -> Result<bool, TableError> {
        let claimed = self
            .claims
            .get_mut(player)
            .ok_or(TableError::UnknownPlayer(player))?;

        match claimed.iter().position(|&s| s == slot) {
            Some(pos) => {
                claimed.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Withdraw all claims of a player, returning the released slots
    pub fn clear_claims(&mut self, player: PlayerId) -> Result<Vec<Slot>, TableError> {
        let claimed = self
            .claims
            .get_mut(player)
            .ok_or(TableError::UnknownPlayer(player))?;
        Ok(std::mem::take(claimed))
    }

    /// Check every grid invariant
    pub fn is_consistent(&self) -> bool {
        let slots_match = self.slot_to_card.iter().enumerate().all(|(slot, card)| match card {
            Some(card) => self.card_to_slot.get(*card) == Some(&Some(slot)),
            None => true,
        });

        let cards_match = self.card_to_slot.iter().enumerate().all(|(card, slot)| match slot {
            Some(slot) => self.slot_to_card.get(*slot) == Some(&Some(card)),
            None => true,
        });

        let claims_valid = self.claims.iter().all(|claimed| {
            claimed.len() <= self.feature_size
                && claimed.iter().all(|&slot| self.card_at(slot).is_some())
                && claimed
                    .iter()
                    .enumerate()
                    .all(|(i, slot)| !claimed[..i].contains(slot))
        });

        slots_match && cards_match && claims_valid
    }
}
