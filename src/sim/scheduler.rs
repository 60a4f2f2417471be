//! Centralized delayed-event scheduler
//!
//! Everything the game used to express as "call me back in N milliseconds"
//! (bay reloads, torpedo flight timeouts, the respawn countdown) is a due
//! tick in one priority queue the tick function drains before each update
//! pass. Stale events are disarmed by the generation stamps the payloads
//! carry, not by removal from the queue.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::ship::ShipId;

/// A scheduled simulation event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Return one torpedo bay to `ship`, if it is still the same life
    ReloadBay { ship: ShipId, generation: u32 },
    /// Detonate a torpedo that has flown too long, if it still exists
    TorpedoTimeout { torpedo: u32 },
    /// Bring the player back after the respawn countdown
    RespawnPlayer,
}

#[derive(Debug, Clone)]
struct Entry {
    due: u64,
    /// Tie-breaker keeping same-tick events in schedule order
    seq: u64,
    event: Event,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, we want the earliest due first
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

/// Priority queue of future events, keyed by absolute due tick
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Entry>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` to fire once `now + delay_ticks` is reached
    pub fn schedule(&mut self, now: u64, delay_ticks: u64, event: Event) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Entry {
            due: now + delay_ticks,
            seq,
            event,
        });
    }

    /// Pop the next event due at or before `now`, in (due, schedule) order
    pub fn pop_due(&mut self, now: u64) -> Option<Event> {
        if self.queue.peek().is_some_and(|e| e.due <= now) {
            self.queue.pop().map(|e| e.event)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop every outstanding event (scene teardown)
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
