//! Deferred callback queue in virtual time.
//!
//! Every suspension point of a round (spawn delays, settle delay, physics and
//! clock ticks, next-round delay) is an entry here, so the game can drop all
//! of them at once. The driver feeds wall-clock time in through
//! [`Scheduler::pop_due`]; tests feed synthetic time.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct Entry<E> {
    due: u64,
    id: TimerId,
    event: E,
}

// Ordered by due time, then by scheduling order.
impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.id == other.id
    }
}

impl<E> Eq for Entry<E> {}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Entry<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.id.0).cmp(&(other.due, other.id.0))
    }
}

pub struct Scheduler<E> {
    now_ms: u64,
    next_id: u64,
    queue: BinaryHeap<Reverse<Entry<E>>>,
    // Live timers and their repeat period (None = one-shot).
    live: HashMap<TimerId, Option<u64>>,
}

impl<E: Clone> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            queue: BinaryHeap::new(),
            live: HashMap::new(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of timers that can still fire.
    pub fn pending(&self) -> usize {
        self.live.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.live.contains_key(&id)
    }

    /// Fire `event` once, `delay_ms` from now.
    pub fn schedule(&mut self, delay_ms: u64, event: E) -> TimerId {
        self.push(delay_ms, None, event)
    }

    /// Fire `event` every `period_ms`, first time one period from now.
    pub fn schedule_every(&mut self, period_ms: u64, event: E) -> TimerId {
        let period = period_ms.max(1);
        self.push(period, Some(period), event)
    }

    fn push(&mut self, delay_ms: u64, period: Option<u64>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.live.insert(id, period);
        self.queue.push(Reverse(Entry {
            due: self.now_ms + delay_ms,
            id,
            event,
        }));
        id
    }

    /// Returns whether the timer was still live.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.live.remove(&id).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.live.clear();
        self.queue.clear();
    }

    /// Pop the next timer due at or before `until_ms`, moving the clock to its
    /// due time. Interval timers are re-armed before returning. Once nothing
    /// else is due the clock settles at `until_ms`.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerId, E)> {
        loop {
            let due = match self.queue.peek() {
                Some(Reverse(top)) if top.due <= until_ms => top.due,
                _ => {
                    self.now_ms = self.now_ms.max(until_ms);
                    return None;
                }
            };
            let Some(Reverse(entry)) = self.queue.pop() else {
                return None;
            };
            let Some(&period) = self.live.get(&entry.id) else {
                continue; // cancelled
            };
            self.now_ms = due;
            match period {
                Some(p) => self.queue.push(Reverse(Entry {
                    due: due + p,
                    id: entry.id,
                    event: entry.event.clone(),
                })),
                None => {
                    self.live.remove(&entry.id);
                }
            }
            return Some((entry.id, entry.event));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler<&'static str>, until: u64) -> Vec<(u64, &'static str)> {
        let mut out = Vec::new();
        while let Some((_, e)) = s.pop_due(until) {
            out.push((s.now_ms(), e));
        }
        out
    }

    #[test]
    fn test_fires_in_due_then_schedule_order() {
        let mut s = Scheduler::new();
        s.schedule(300, "b");
        s.schedule(0, "a");
        s.schedule(300, "c");
        assert_eq!(drain(&mut s, 1_000), vec![(0, "a"), (300, "b"), (300, "c")]);
        assert_eq!(s.now_ms(), 1_000);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn test_interval_rearms() {
        let mut s = Scheduler::new();
        let id = s.schedule_every(100, "tick");
        assert_eq!(drain(&mut s, 350).len(), 3);
        assert!(s.is_pending(id));
        assert!(s.cancel(id));
        assert!(drain(&mut s, 10_000).is_empty());
    }

    #[test]
    fn test_cancel_all_drops_everything() {
        let mut s = Scheduler::new();
        s.schedule(10, "x");
        s.schedule_every(16, "y");
        s.cancel_all();
        assert_eq!(s.pending(), 0);
        assert!(drain(&mut s, 1_000).is_empty());
    }

    #[test]
    fn test_not_due_stays_queued() {
        let mut s = Scheduler::new();
        s.schedule(500, "later");
        assert!(drain(&mut s, 499).is_empty());
        assert_eq!(drain(&mut s, 500), vec![(500, "later")]);
    }
}
