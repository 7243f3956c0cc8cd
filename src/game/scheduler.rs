use std::time::Duration;

use log::trace;

pub type Generation = u64;

#[derive(Debug)]
struct Scheduled<A> {
    due: Duration,
    generation: Generation,
    seq: u64,
    action: A,
}

/// Actions to run once a point on the engine clock has passed.
///
/// Every action is tagged with the session generation that scheduled it so a reset can
/// drop everything belonging to the session it replaced.
#[derive(Debug)]
pub struct DeferredQueue<A> {
    pending: Vec<Scheduled<A>>,
    next_seq: u64,
}

impl<A> Default for DeferredQueue<A> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<A: std::fmt::Debug> DeferredQueue<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Duration, delay: Duration, generation: Generation, action: A) {
        let due = now.saturating_add(delay);
        trace!(target: "scheduler", "Scheduling {:?} at {:?} (generation {})", action, due, generation);
        self.pending.push(Scheduled {
            due,
            generation,
            seq: self.next_seq,
            action,
        });
        self.next_seq += 1;
    }

    /// Drops every action not tagged with `current`; returns how many were dropped.
    pub fn cancel_stale(&mut self, current: Generation) -> usize {
        let before = self.pending.len();
        self.pending.retain(|scheduled| scheduled.generation == current);
        before - self.pending.len()
    }

    /// Removes and returns the actions due at `now`, earliest first; ties keep scheduling order.
    pub fn take_due(&mut self, now: Duration) -> Vec<(Generation, A)> {
        let (mut due, pending): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|scheduled| scheduled.due <= now);
        self.pending = pending;
        due.sort_by_key(|scheduled| (scheduled.due, scheduled.seq));
        due.into_iter()
            .map(|scheduled| (scheduled.generation, scheduled.action))
            .collect()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.pending.iter().map(|scheduled| scheduled.due).min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
