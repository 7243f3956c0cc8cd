use serde::{Deserialize, Serialize};

/// Where a session is in the turn cycle. Derived from the selection size and the
/// outcome rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    Idle,
    AwaitingSecondPick,
    Resolving,
    Won,
    Lost,
}
