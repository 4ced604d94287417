//! Deferred one-shot events on the simulation clock
//!
//! Entries fire once, in due order (ties in scheduling order), when the clock passes them.
//! The clock only moves when the world steps, so a replay with the same deltas fires the same
//! events on the same steps.

use serde::{Deserialize, Serialize};

/// Something scheduled to happen later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// Kill a monster outright (win sequence)
    FinishingBlow { monster_id: u32 },
    /// Tell the UI the level is done
    LevelComplete,
}

/// Handle for cancelling a scheduled entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Entry {
    id: TimerId,
    due: f64,
    event: TimerEvent,
}

/// Pending timers plus the clock they run against
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    now: f64,
    next_id: u64,
    entries: Vec<Entry>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds of simulation time seen so far
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Fire `event` once `delay` seconds from now
    pub fn schedule(&mut self, delay: f32, event: TimerEvent) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due: self.now + f64::from(delay),
            event,
        });
        id
    }

    /// Drop a pending entry. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Drop every pending entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move the clock forward and take every entry that came due
    pub fn advance(&mut self, seconds: f32) -> Vec<TimerEvent> {
        self.now += f64::from(seconds);
        let now = self.now;

        let (mut due, pending): (Vec<Entry>, Vec<Entry>) =
            self.entries.drain(..).partition(|e| e.due <= now);
        self.entries = pending;

        // Ids grow with scheduling order, so they break ties between equal due times
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)));
        due.into_iter().map(|e| e.event).collect()
    }
}
