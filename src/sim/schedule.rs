//! Delayed work items drained by the session clock
//!
//! Entries are never cancelled; each action checks session state when it
//! fires and drops itself if the game has ended.

use serde::{Deserialize, Serialize};

/// What to do when an entry comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledAction {
    /// Dispatch the next wave of the sequence
    TossWave,
    /// One delayed member of a chain wave
    ChainSpawn { wave: usize },
    /// The current swoosh effect has finished playing
    SwooshFinished,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEntry {
    pub fire_at: f64,
    pub action: ScheduledAction,
    /// Insertion order, breaks ties between equal fire times
    seq: u64,
}

/// Pending timed actions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    entries: Vec<ScheduledEntry>,
    next_seq: u64,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to fire once the clock reaches `fire_at`
    pub fn push(&mut self, fire_at: f64, action: ScheduledAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(ScheduledEntry {
            fire_at,
            action,
            seq,
        });
    }

    /// Remove and return every entry due at `now`, earliest first
    ///
    /// Equal fire times come out in insertion order.
    pub fn drain_due(&mut self, now: f64) -> Vec<ScheduledEntry> {
        let mut due: Vec<ScheduledEntry> = Vec::new();
        self.entries.retain(|entry| {
            if entry.fire_at <= now {
                due.push(*entry);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.fire_at.total_cmp(&b.fire_at).then(a.seq.cmp(&b.seq)));
        due
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pending entries matching `pred`
    pub fn count_where(&self, pred: impl Fn(&ScheduledAction) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.action)).count()
    }

    /// Pending entries, in insertion order
    pub fn entries(&self) -> &[ScheduledEntry] {
        &self.entries
    }
}
