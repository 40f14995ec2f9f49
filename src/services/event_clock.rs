//! Logical simulation clock.
//!
//! Events are kept in a min-heap ordered by `(time, id)`; ids grow with every
//! schedule call, so events at equal times pop in insertion order. A cancelled
//! event stays in the heap but is skipped when it reaches the top.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(u64);

#[derive(Debug)]
struct ScheduledEvent<E> {
    time: f64,
    id: EventId,
    event: E,
}

impl<E> PartialEq for ScheduledEvent<E> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<E> Eq for ScheduledEvent<E> {}

impl<E> PartialOrd for ScheduledEvent<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for ScheduledEvent<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so that the BinaryHeap pops the earliest event first.
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.id.cmp(&self.id))
    }
}

pub struct EventClock<E> {
    now: f64,
    horizon: f64,
    next_id: u64,
    queue: BinaryHeap<ScheduledEvent<E>>,
    pending: HashSet<EventId>,
    finished: bool,
}

impl<E> EventClock<E> {
    pub fn new(horizon: f64) -> Self {
        Self {
            now: 0.0,
            horizon,
            next_id: 0,
            queue: BinaryHeap::new(),
            pending: HashSet::new(),
            finished: false,
        }
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    #[cfg(test)]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn schedule_after(&mut self, delay: f64, event: E) -> EventId {
        let id = EventId(self.next_id);
        self.next_id += 1;
        self.queue.push(ScheduledEvent {
            time: self.now + delay.max(0.0),
            id,
            event,
        });
        self.pending.insert(id);
        id
    }

    pub fn cancel(&mut self, id: EventId) -> bool {
        self.pending.remove(&id)
    }

    // Returns `None` once the next event lies at or beyond the horizon; the
    // clock then rests at the horizon.
    pub fn advance(&mut self) -> Option<E> {
        if self.finished {
            return None;
        }
        while let Some(scheduled) = self.queue.pop() {
            if !self.pending.remove(&scheduled.id) {
                continue;
            }
            if scheduled.time >= self.horizon {
                break;
            }
            self.now = scheduled.time;
            return Some(scheduled.event);
        }
        self.now = self.horizon;
        self.finished = true;
        self.queue.clear();
        self.pending.clear();
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_fire_in_time_order() {
        let mut clock = EventClock::new(100.0);
        clock.schedule_after(3.0, "c");
        clock.schedule_after(1.0, "a");
        clock.schedule_after(2.0, "b");

        assert_eq!(clock.advance(), Some("a"));
        assert_eq!(clock.now(), 1.0);
        assert_eq!(clock.advance(), Some("b"));
        assert_eq!(clock.advance(), Some("c"));
        assert_eq!(clock.now(), 3.0);
    }

    #[test]
    fn ties_are_broken_by_insertion_order() {
        let mut clock = EventClock::new(100.0);
        clock.schedule_after(5.0, 1);
        clock.schedule_after(5.0, 2);
        clock.schedule_after(5.0, 3);

        assert_eq!(clock.advance(), Some(1));
        assert_eq!(clock.advance(), Some(2));
        assert_eq!(clock.advance(), Some(3));
    }

    #[test]
    fn delays_are_relative_to_the_current_time() {
        let mut clock = EventClock::new(100.0);
        clock.schedule_after(2.0, "first");
        clock.advance();
        clock.schedule_after(2.0, "second");

        assert_eq!(clock.advance(), Some("second"));
        assert_eq!(clock.now(), 4.0);
    }

    #[test]
    fn cancelled_events_never_fire() {
        let mut clock = EventClock::new(100.0);
        let patience = clock.schedule_after(1.0, "patience");
        clock.schedule_after(2.0, "service");

        assert!(clock.cancel(patience));
        assert!(!clock.cancel(patience));
        assert_eq!(clock.advance(), Some("service"));
        assert_eq!(clock.advance(), None);
    }

    #[test]
    fn fired_events_cannot_be_cancelled() {
        let mut clock = EventClock::new(100.0);
        let id = clock.schedule_after(1.0, ());
        clock.advance();

        assert!(!clock.cancel(id));
    }

    #[test]
    fn clock_stops_at_the_horizon_and_abandons_the_rest() {
        let mut clock = EventClock::new(10.0);
        clock.schedule_after(9.5, "inside");
        clock.schedule_after(10.0, "at horizon");
        clock.schedule_after(12.0, "beyond");

        assert_eq!(clock.advance(), Some("inside"));
        assert_eq!(clock.advance(), None);
        assert_eq!(clock.now(), 10.0);
        assert!(clock.is_finished());

        clock.schedule_after(0.0, "late");
        assert_eq!(clock.advance(), None);
        assert_eq!(clock.now(), 10.0);
    }

    #[test]
    fn time_never_runs_backwards() {
        let mut clock = EventClock::new(100.0);
        clock.schedule_after(4.0, ());
        clock.advance();
        clock.schedule_after(-1.0, ());
        clock.advance();

        assert_eq!(clock.now(), 4.0);
    }
}
