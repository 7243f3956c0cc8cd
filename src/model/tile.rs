use serde::{Deserialize, Serialize};

use super::CardId;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Tile {
    pub position: usize, // slot in the shuffled deck
    pub card_id: CardId,
    pub is_solved: bool,
}

impl Tile {
    pub fn new(position: usize, card_id: CardId) -> Self {
        Self {
            position,
            card_id,
            is_solved: false,
        }
    }

    pub fn matches(&self, other: &Tile) -> bool {
        self.position != other.position && self.card_id == other.card_id
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.position, self.card_id)?;
        if self.is_solved {
            write!(f, "*")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_requires_distinct_positions() {
        let a = Tile::new(0, CardId(3));
        let b = Tile::new(7, CardId(3));
        let c = Tile::new(8, CardId(4));

        assert!(a.matches(&b));
        assert!(!a.matches(&a));
        assert!(!a.matches(&c));
    }

    #[test]
    fn test_display() {
        let mut tile = Tile::new(4, CardId(2));
        assert_eq!(tile.to_string(), "4:2");
        tile.is_solved = true;
        assert_eq!(format!("{:?}", tile), "4:2*");
    }
}
