use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::{CardId, Tile};

/// Column count used when printing a deck as a grid.
pub const DECK_COLUMNS: usize = 6;

/// The shuffled tiles of one session. Card identities never change after the deck
/// is built; only the solved flags do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    tiles: Vec<Tile>,
}

impl Deck {
    pub fn from_cards(cards: Vec<CardId>) -> Self {
        let tiles = cards
            .into_iter()
            .enumerate()
            .map(|(position, card_id)| Tile::new(position, card_id))
            .collect();
        Self { tiles }
    }

    #[cfg(test)]
    /// Parse a deck from whitespace separated card ids, e.g. "0 1 1 0".
    pub fn parse(s: &str) -> Self {
        let cards = s
            .split_whitespace()
            .map(|id| CardId(id.parse().unwrap()))
            .collect();
        Self::from_cards(cards)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn get(&self, position: usize) -> Option<&Tile> {
        self.tiles.get(position)
    }

    pub fn is_solved(&self, position: usize) -> bool {
        self.get(position).map(|tile| tile.is_solved).unwrap_or(false)
    }

    pub(crate) fn mark_solved(&mut self, position: usize) {
        if let Some(tile) = self.tiles.get_mut(position) {
            tile.is_solved = true;
        }
    }

    pub fn solved_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_solved).count()
    }

    /// True once every tile is solved. An empty deck is never complete.
    pub fn is_complete(&self) -> bool {
        !self.tiles.is_empty() && self.tiles.iter().all(|tile| tile.is_solved)
    }

    pub fn pair_count(&self) -> usize {
        self.tiles.len() / 2
    }

    /// Even length and every card id on exactly two tiles.
    pub fn validate(&self) -> bool {
        self.tiles.len() % 2 == 0
            && self
                .tiles
                .iter()
                .map(|tile| tile.card_id)
                .counts()
                .values()
                .all(|&count| count == 2)
    }
}

impl std::fmt::Display for Deck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.tiles.chunks(DECK_COLUMNS) {
            let line = row
                .iter()
                .map(|tile| format!("{:>4}", tile.to_string()))
                .join("|");
            writeln!(f, "|{}|", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_validate() {
        let deck = Deck::parse("0 1 2 2 1 0");
        assert_eq!(deck.len(), 6);
        assert_eq!(deck.pair_count(), 3);
        assert_eq!(deck.get(3).map(|tile| tile.card_id), Some(CardId(2)));
        assert!(deck.validate());

        assert!(!Deck::parse("0 1 1").validate());
        assert!(!Deck::parse("0 0 0 0").validate());
        assert!(!Deck::parse("0 1 2 3").validate());
    }

    #[test]
    fn test_solved_tracking() {
        let mut deck = Deck::parse("0 1 1 0");
        assert!(!deck.is_complete());

        deck.mark_solved(1);
        deck.mark_solved(2);
        assert_eq!(deck.solved_count(), 2);
        assert!(deck.is_solved(2));
        assert!(!deck.is_solved(0));
        assert!(!deck.is_solved(99));

        deck.mark_solved(0);
        deck.mark_solved(3);
        assert!(deck.is_complete());
    }

    #[test]
    fn test_empty_deck_is_not_complete() {
        assert!(!Deck::default().is_complete());
    }

    #[test]
    fn test_display_wraps_rows() {
        let deck = Deck::parse("0 1 2 3 4 5 0 1 2 3 4 5");
        let printed = deck.to_string();
        assert_eq!(printed.lines().count(), 2);
        assert!(printed.starts_with("| 0:0| 1:1|"));
    }
}
