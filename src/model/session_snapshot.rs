use serde::Serialize;
use uuid::Uuid;

use super::{CardId, Outcome, RankingEntry, SessionPhase, FACE_DOWN_IMAGE};

/// What a renderer may know about one tile. The card id is withheld while the tile
/// is face down so a front end cannot leak unflipped identities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileView {
    pub position: usize,
    pub card_id: Option<CardId>,
    pub is_solved: bool,
    pub is_face_up: bool,
}

impl TileView {
    pub fn image(&self) -> &'static str {
        self.card_id
            .and_then(|card_id| card_id.image())
            .unwrap_or(FACE_DOWN_IMAGE)
    }
}

/// Read-only, render-ready view of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub generation: u64,
    pub playthrough_id: Uuid,
    pub tiles: Vec<TileView>,
    pub selection: Vec<usize>,
    pub attempts: u32,
    pub elapsed_seconds: u64,
    pub outcome: Outcome,
    pub phase: SessionPhase,
    pub leaderboard: Vec<RankingEntry>,
}

impl SessionSnapshot {
    pub fn solved_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_solved).count()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
