use std::time::Duration;

use serde_with::serde_as;
use serde_with::DurationMilliSeconds;

/// Start and end marks of a session, measured on the engine clock.
///
/// The timer starts on the first revealed tile rather than when the deck is dealt, so
/// idle time before the first move is not counted.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimerState {
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    pub started_at: Option<Duration>,
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    pub ended_at: Option<Duration>,
}

impl TimerState {
    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && self.ended_at.is_none()
    }

    pub fn elapsed(&self, now: Duration) -> Duration {
        match self.started_at {
            Some(started_at) => self
                .ended_at
                .unwrap_or(now)
                .saturating_sub(started_at),
            None => Duration::default(),
        }
    }

    /// Whole seconds elapsed, rounded down.
    pub fn elapsed_seconds(&self, now: Duration) -> u64 {
        self.elapsed(now).as_secs()
    }

    pub fn started(&self, now: Duration) -> TimerState {
        let mut new_state = self.clone();
        if new_state.started_at.is_none() {
            new_state.started_at = Some(now);
        }
        new_state
    }

    pub fn ended(&self, now: Duration) -> TimerState {
        let mut new_state = self.clone();
        if new_state.is_running() {
            new_state.ended_at = Some(now);
        }
        new_state
    }
}
