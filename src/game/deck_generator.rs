use itertools::Itertools;
use log::{trace, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::model::{CardId, Deck};

/// Source of the permutation applied to a freshly duplicated deck.
pub trait DeckShuffler {
    fn shuffle(&mut self, cards: &mut [CardId]);
}

/// Uniform shuffle backed by `StdRng`.
#[derive(Debug, Clone)]
pub struct RandomShuffler {
    rng: StdRng,
}

impl RandomShuffler {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence of decks, e.g. for replaying a reported game.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl DeckShuffler for RandomShuffler {
    fn shuffle(&mut self, cards: &mut [CardId]) {
        cards.shuffle(&mut self.rng);
    }
}

/// Moves the card at `order[i]` into slot `i`. A permutation that does not fit the deck is
/// ignored and the cards keep their generated order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPermutation {
    order: Vec<usize>,
}

impl FixedPermutation {
    pub fn new(order: Vec<usize>) -> Self {
        Self { order }
    }

    pub fn identity(len: usize) -> Self {
        Self::new((0..len).collect())
    }

    fn fits(&self, len: usize) -> bool {
        self.order.len() == len
            && self.order.iter().all(|&source| source < len)
            && self.order.iter().all_unique()
    }
}

impl DeckShuffler for FixedPermutation {
    fn shuffle(&mut self, cards: &mut [CardId]) {
        if !self.fits(cards.len()) {
            warn!(
                target: "deck",
                "Permutation {:?} does not fit a deck of {}; leaving cards in order",
                self.order,
                cards.len()
            );
            return;
        }
        let original = cards.to_vec();
        for (slot, &source) in self.order.iter().enumerate() {
            cards[slot] = original[source];
        }
    }
}

/// Duplicates every card of `catalog` and shuffles the pairs into a new deck.
///
/// Before shuffling, the deck is the catalog followed by the catalog again, so with an
/// identity permutation the pair of position `i` sits at `i + catalog.len()`.
pub fn generate_deck(catalog: &[CardId], shuffler: &mut dyn DeckShuffler) -> Deck {
    let mut cards: Vec<CardId> = catalog.iter().chain(catalog.iter()).copied().collect();
    shuffler.shuffle(&mut cards);

    let deck = Deck::from_cards(cards);
    debug_assert!(deck.validate(), "generated deck breaks pairing: {:?}", deck);
    trace!(target: "deck", "Generated deck:\n{}", deck);
    deck
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog;

    #[test]
    fn test_random_decks_are_paired() {
        let mut shuffler = RandomShuffler::from_entropy();
        for pair_count in 1..=12 {
            for _ in 0..20 {
                let deck = generate_deck(&catalog(pair_count), &mut shuffler);
                assert_eq!(deck.len(), pair_count * 2);
                assert!(deck.validate());
                assert!(deck.tiles().iter().all(|tile| !tile.is_solved));
            }
        }
    }

    #[test]
    fn test_positions_are_slots() {
        let deck = generate_deck(&catalog(6), &mut RandomShuffler::from_entropy());
        for (index, tile) in deck.tiles().iter().enumerate() {
            assert_eq!(tile.position, index);
        }
    }

    #[test]
    fn test_fixed_permutation_gives_exact_order() {
        let mut shuffler = FixedPermutation::new(vec![5, 0, 4, 1, 3, 2]);
        let deck = generate_deck(&catalog(3), &mut shuffler);

        // before shuffling: 0 1 2 0 1 2
        assert_eq!(deck, Deck::parse("2 0 1 1 0 2"));
    }

    #[test]
    fn test_identity_permutation() {
        let deck = generate_deck(&catalog(4), &mut FixedPermutation::identity(8));
        assert_eq!(deck, Deck::parse("0 1 2 3 0 1 2 3"));
    }

    #[test]
    fn test_unfit_permutation_is_ignored() {
        let unfit = [vec![0, 1, 2], vec![0, 0, 1, 2], vec![0, 1, 2, 9]];
        for order in unfit {
            let deck = generate_deck(&catalog(2), &mut FixedPermutation::new(order));
            assert_eq!(deck, Deck::parse("0 1 0 1"));
        }
    }

    #[test]
    fn test_seeded_shuffler_is_reproducible() {
        let mut first = RandomShuffler::seeded(7);
        let mut second = RandomShuffler::seeded(7);

        for _ in 0..5 {
            assert_eq!(
                generate_deck(&catalog(12), &mut first),
                generate_deck(&catalog(12), &mut second)
            );
        }
    }
}
