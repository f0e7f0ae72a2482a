//! Deadline-based timers that are fired explicitly.
//!
//! A [`Scheduler`] never runs anything on its own: the owner asks it for the
//! events that are due at a given instant. Real runtimes sleep until
//! [`Scheduler::next_due`]; tests pass a hand-moved timestamp.

use chrono::{DateTime, Utc};

/// Handle for cancelling a scheduled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Pending<E> {
    id: TimerId,
    due_at: DateTime<Utc>,
    event: E,
}

#[derive(Debug)]
pub struct Scheduler<E> {
    next_id: u64,
    pending: Vec<Pending<E>>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<E> Scheduler<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `event` to become due at `due_at`.
    pub fn schedule_at(&mut self, due_at: DateTime<Utc>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending { id, due_at, event });
        id
    }

    /// Remove a pending event. Returns `false` if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    #[must_use]
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.pending.iter().map(|p| p.due_at).min()
    }

    /// Remove and return every event due at or before `now`, earliest first.
    ///
    /// Events sharing a deadline come out in scheduling order.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<(TimerId, E)> {
        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due_at <= now);
        self.pending = waiting;
        due.sort_by_key(|p| (p.due_at, p.id.0));
        due.into_iter().map(|p| (p.id, p.event)).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    #[test]
    fn fires_only_due_events_in_deadline_order() {
        let now = fixed_now();
        let mut timers = Scheduler::new();
        timers.schedule_at(now + Duration::milliseconds(900), "late");
        timers.schedule_at(now + Duration::milliseconds(100), "early");
        timers.schedule_at(now + Duration::seconds(5), "later");

        assert_eq!(timers.next_due(), Some(now + Duration::milliseconds(100)));
        let fired: Vec<_> = timers
            .take_due(now + Duration::seconds(1))
            .into_iter()
            .map(|(_, e)| e)
            .collect();
        assert_eq!(fired, vec!["early", "late"]);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn cancelled_events_never_fire() {
        let now = fixed_now();
        let mut timers = Scheduler::new();
        let id = timers.schedule_at(now, ());
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert!(timers.take_due(now).is_empty());
        assert!(timers.is_empty());
    }

    #[test]
    fn nothing_due_before_deadline() {
        let now = fixed_now();
        let mut timers = Scheduler::new();
        timers.schedule_at(now + Duration::milliseconds(820), 1);
        assert!(timers.take_due(now + Duration::milliseconds(819)).is_empty());
        assert_eq!(timers.take_due(now + Duration::milliseconds(820)).len(), 1);
    }
}
