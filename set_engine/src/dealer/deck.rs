//! Cards waiting off the grid.

use rand::seq::SliceRandom;
use std::collections::VecDeque;

use crate::table::Card;

/// Ordered pile of cards not on the grid. Cards are drawn from the front
/// and returned to the back before a reshuffle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    cards: VecDeque<Card>,
}

impl Deck {
    /// Every card in `[0, deck_size)`, shuffled
    pub fn new(deck_size: usize) -> Self {
        let mut deck = Self::from_cards((0..deck_size).collect());
        deck.shuffle();
        deck
    }

    /// A deck in exactly the given order
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self {
            cards: cards.into(),
        }
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }

    pub fn put_back(&mut self, card: Card) {
        self.cards.push_back(card);
    }

    pub fn shuffle(&mut self) {
        self.cards.make_contiguous().shuffle(&mut rand::rng());
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.cards.iter().copied()
    }
}

impl Extend<Card> for Deck {
    fn extend<T: IntoIterator<Item = Card>>(&mut self, iter: T) {
        self.cards.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_deck_holds_every_card_once() {
        let deck = Deck::new(81);
        assert_eq!(deck.len(), 81);
        let unique: HashSet<Card> = deck.cards().collect();
        assert_eq!(unique.len(), 81);
        assert!(unique.iter().all(|&card| card < 81));
    }

    #[test]
    fn test_draw_from_front() {
        let mut deck = Deck::from_cards(vec![4, 2, 9]);
        assert_eq!(deck.draw(), Some(4));
        assert_eq!(deck.draw(), Some(2));
        deck.put_back(4);
        assert_eq!(deck.draw(), Some(9));
        assert_eq!(deck.draw(), Some(4));
        assert_eq!(deck.draw(), None);
        assert!(deck.is_empty());
    }

    #[test]
    fn test_shuffle_keeps_cards() {
        let mut deck = Deck::from_cards((0..20).collect());
        deck.extend([20, 21]);
        deck.shuffle();

        let mut cards: Vec<Card> = deck.cards().collect();
        cards.sort_unstable();
        assert_eq!(cards, (0..22).collect::<Vec<_>>());
    }
}
