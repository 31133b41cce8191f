//! Time-keyed event queue
//!
//! Replaces fire-and-forget timer callbacks. Events pop in due order, ties in
//! the order they were scheduled. Clearing the queue drops every pending timer.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use super::powerup::{PowerUpId, PowerUpKind};

/// Things that happen on a wall-clock schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// Recurring power-up spawn attempt
    SpawnPowerUp,
    /// One-shot removal of an uncollected power-up
    ExpirePowerUp(PowerUpId),
    /// End of a status effect
    ExpireEffect(PowerUpKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    due: u64,
    seq: u64,
    event: TimerEvent,
}

impl Ord for Entry {
    // Reversed: BinaryHeap is a max-heap, we want the earliest first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Entry>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: u64, event: TimerEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Entry { due, seq, event });
    }

    /// Pop the earliest event due at or before `now`
    pub fn pop_due(&mut self, now: u64) -> Option<(u64, TimerEvent)> {
        match self.queue.peek() {
            Some(entry) if entry.due <= now => self.queue.pop().map(|e| (e.due, e.event)),
            _ => None,
        }
    }

    /// Due time of the next pending event
    pub fn next_due(&self) -> Option<u64> {
        self.queue.peek().map(|e| e.due)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.next_seq = 0;
    }
}
