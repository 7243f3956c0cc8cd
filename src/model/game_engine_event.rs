use super::{Outcome, RankingEntry, SessionSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum GameEngineEvent {
    SessionUpdated(SessionSnapshot),
    TilesResolved {
        positions: [usize; 2],
        matched: bool,
    },
    ElapsedChanged(u64),
    SessionFinished {
        outcome: Outcome,
        entry: Option<RankingEntry>,
    },
    LeaderboardUpdated(Vec<RankingEntry>),
}
