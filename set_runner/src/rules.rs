//! The classic Set rule over feature vectors.

use set_engine::{Card, RuleValidator, rules::enumerate_sets};

/// Cards decoded as feature vectors: digit `i` of a card written in base
/// `feature_size` is the value of feature `i`. A group of `feature_size`
/// distinct cards is a set when every feature is either the same on all
/// cards or different on all cards.
///
/// With the default sizes (81 cards, sets of 3) this is the standard game:
/// four features with three values each.
#[derive(Debug, Clone)]
pub struct ClassicRules {
    feature_size: usize,
    features: usize,
}

impl ClassicRules {
    pub fn new(feature_size: usize, deck_size: usize) -> Self {
        let base = feature_size.max(2);
        let mut features = 1;
        let mut capacity = base;
        while capacity < deck_size {
            capacity = capacity.saturating_mul(base);
            features += 1;
        }

        Self {
            feature_size,
            features,
        }
    }

    pub fn features(&self) -> usize {
        self.features
    }

    /// Feature values of a card, least significant first
    pub fn decode(&self, card: Card) -> Vec<usize> {
        let base = self.feature_size.max(2);
        let mut rest = card;
        (0..self.features)
            .map(|_| {
                let value = rest % base;
                rest /= base;
                value
            })
            .collect()
    }
}

impl RuleValidator for ClassicRules {
    fn is_legal_set(&self, cards: &[Card]) -> bool {
        if cards.len() != self.feature_size {
            return false;
        }
        if cards.iter().enumerate().any(|(i, c)| cards[..i].contains(c)) {
            return false;
        }

        let decoded: Vec<Vec<usize>> = cards.iter().map(|&c| self.decode(c)).collect();
        (0..self.features).all(|feature| {
            let values: Vec<usize> = decoded.iter().map(|v| v[feature]).collect();
            let all_same = values.iter().all(|&v| v == values[0]);
            let all_different = values
                .iter()
                .enumerate()
                .all(|(i, v)| !values[..i].contains(v));
            all_same || all_different
        })
    }

    fn find_sets(&self, cards: &[Card], limit: usize) -> Vec<Vec<Card>> {
        enumerate_sets(cards, self.feature_size, limit, |group| {
            self.is_legal_set(group)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_deck_has_four_features() {
        let rules = ClassicRules::new(3, 81);
        assert_eq!(rules.features(), 4);
        assert_eq!(rules.decode(0), vec![0, 0, 0, 0]);
        assert_eq!(rules.decode(80), vec![2, 2, 2, 2]);
        // 5 = 1*3 + 2
        assert_eq!(rules.decode(5), vec![2, 1, 0, 0]);
    }

    #[test]
    fn test_all_same_or_all_different() {
        let rules = ClassicRules::new(3, 81);
        // Differ only in the first feature: 0, 1, 2
        assert!(rules.is_legal_set(&[0, 1, 2]));
        // Every feature different
        assert!(rules.is_legal_set(&[0, 40, 80]));
        // First feature 0, 1, 0
        assert!(!rules.is_legal_set(&[0, 1, 3]));
        assert!(!rules.is_legal_set(&[0, 1]));
        assert!(!rules.is_legal_set(&[0, 0, 0]));
    }

    #[test]
    fn test_any_two_cards_complete_exactly_one_set() {
        let rules = ClassicRules::new(3, 81);
        let deck: Vec<Card> = (0..81).collect();
        let sets = rules.find_sets(&deck, usize::MAX);
        // 81 * 80 / 6
        assert_eq!(sets.len(), 1080);
    }

    #[test]
    fn test_find_sets_respects_limit() {
        let rules = ClassicRules::new(3, 81);
        let deck: Vec<Card> = (0..81).collect();
        assert_eq!(rules.find_sets(&deck, 1), vec![vec![0, 1, 2]]);
        assert!(rules.find_sets(&[0, 1, 3, 4], usize::MAX).is_empty());
    }

    #[test]
    fn test_small_decks() {
        let rules = ClassicRules::new(3, 9);
        assert_eq!(rules.features(), 2);
        let rules = ClassicRules::new(3, 10);
        assert_eq!(rules.features(), 3);
    }
}
