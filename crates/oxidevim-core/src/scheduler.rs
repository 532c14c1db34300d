//! Virtual-time scheduling for delayed status updates.
//!
//! ## Learning: Time as Data
//!
//! Instead of spawning timers, the editor queues items with a deadline on
//! a clock it owns. Whoever drives the editor decides how time passes:
//! tests call `advance` with exact durations, the binary sleeps on a tokio
//! timer until `time_until_next` and then advances by the same amount.
//! Nothing here knows about wall-clock time.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

struct Entry<T> {
    due: Duration,
    seq: u64,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed so the max-heap pops the earliest deadline first,
    // and among equal deadlines the earliest scheduled.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A queue of items that become due at points in virtual time.
pub struct Scheduler<T> {
    now: Duration,
    next_seq: u64,
    queue: BinaryHeap<Entry<T>>,
}

impl<T> Scheduler<T> {
    /// Creates an empty scheduler at time zero.
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// Returns the current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queues an item to fire `after` the current time.
    pub fn schedule(&mut self, after: Duration, item: T) {
        let entry = Entry {
            due: self.now + after,
            seq: self.next_seq,
            item,
        };
        self.next_seq += 1;
        self.queue.push(entry);
    }

    /// Moves time forward and returns every item that became due, in
    /// deadline order (ties in the order they were scheduled).
    pub fn advance(&mut self, by: Duration) -> Vec<T> {
        self.now += by;

        let mut due = Vec::new();
        while self.queue.peek().is_some_and(|e| e.due <= self.now) {
            if let Some(entry) = self.queue.pop() {
                due.push(entry.item);
            }
        }
        due
    }

    /// Returns the deadline of the next item, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.peek().map(|e| e.due)
    }

    /// Returns how long until the next item is due.
    pub fn time_until_next(&self) -> Option<Duration> {
        self.next_deadline()
            .map(|due| due.saturating_sub(self.now))
    }

    /// Returns the number of queued items.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if nothing is queued.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drops every queued item.
    pub fn cancel_all(&mut self) {
        self.queue.clear();
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
