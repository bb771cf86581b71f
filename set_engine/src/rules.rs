//! Legal-set capability injected into the engine.
//!
//! The engine never decides on its own whether a group of cards forms a set.
//! The dealer asks a [`RuleValidator`] when arbitrating a claim, when
//! checking whether the game can still continue and when producing hints.

use crate::table::Card;

/// Decides which groups of cards form a legal set
pub trait RuleValidator: Send + Sync {
    /// Whether the given cards form a legal set
    fn is_legal_set(&self, cards: &[Card]) -> bool;

    /// Find up to `limit` legal sets among `cards`
    fn find_sets(&self, cards: &[Card], limit: usize) -> Vec<Vec<Card>>;
}

/// Enumerate every `size`-card combination of `cards` in lexicographic index
/// order and collect those accepted by `is_legal`, stopping after `limit`.
///
/// Validators whose rule is a plain predicate can implement
/// [`RuleValidator::find_sets`] with this.
pub fn enumerate_sets<F>(cards: &[Card], size: usize, limit: usize, mut is_legal: F) -> Vec<Vec<Card>>
where
    F: FnMut(&[Card]) -> bool,
{
    let mut found = Vec::new();
    if size == 0 || size > cards.len() || limit == 0 {
        return found;
    }

    let mut indices: Vec<usize> = (0..size).collect();
    let mut group = Vec::with_capacity(size);
    loop {
        group.clear();
        group.extend(indices.iter().map(|&i| cards[i]));
        if is_legal(&group) {
            found.push(group.clone());
            if found.len() >= limit {
                return found;
            }
        }

        // Advance to the next combination
        let mut pos = size;
        while pos > 0 && indices[pos - 1] == cards.len() - size + pos - 1 {
            pos -= 1;
        }
        if pos == 0 {
            return found;
        }
        indices[pos - 1] += 1;
        for next in pos..size {
            indices[next] = indices[next - 1] + 1;
        }
    }
}
