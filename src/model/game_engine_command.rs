/// Input forwarded into the engine by a front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEngineCommand {
    RevealTile(usize), // tile position
    Reset,
    /// Periodic one-second tick.
    Tick,
    /// Fire any deferred actions that have come due; carries no input of its own.
    Poll,
    ReloadLeaderboard,
}
