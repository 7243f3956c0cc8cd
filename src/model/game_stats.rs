use serde::{Deserialize, Serialize};

use super::TimerState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    pub fn is_finished(&self) -> bool {
        *self != Outcome::InProgress
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub attempts: u32,
    pub elapsed_seconds: u64,
    pub timer: TimerState,
    pub outcome: Outcome,
}

/// One won session on the leaderboard.
///
/// Stored as `{"time": secs, "attempts": n}`. Field order matters: the derived `Ord`
/// ranks by time first and failed attempts second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RankingEntry {
    #[serde(rename = "time", alias = "elapsedSeconds", alias = "elapsed_seconds")]
    pub elapsed_seconds: u64,
    pub attempts: u32,
}

impl RankingEntry {
    pub fn new(elapsed_seconds: u64, attempts: u32) -> Self {
        Self {
            elapsed_seconds,
            attempts,
        }
    }
}
