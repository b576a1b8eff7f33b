//! Virtual-clock timer queue
//!
//! The controller never sleeps. The UI loop feeds it elapsed wall time and
//! the queue hands back every task whose deadline has passed, earliest
//! first. Tests drive the same clock by hand.

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::time::Duration;

/// Handle returned by [`TimerQueue::schedule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Tasks ordered by deadline, then by scheduling order
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<(Duration, u64), T>,
    deadlines: FxHashMap<u64, Duration>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        TimerQueue {
            now: Duration::ZERO,
            next_id: 0,
            pending: BTreeMap::new(),
            deadlines: FxHashMap::default(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Run `task` once `delay` has elapsed from now
    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        let deadline = self.now.saturating_add(delay);
        self.pending.insert((deadline, id), task);
        self.deadlines.insert(id, deadline);
        TimerHandle(id)
    }

    /// Drop a pending task. Returns it if it had not fired yet.
    pub fn cancel(&mut self, id: TimerHandle) -> Option<T> {
        let deadline = self.deadlines.remove(&id.0)?;
        self.pending.remove(&(deadline, id.0))
    }

    /// Deadline of a pending task
    pub fn deadline(&self, id: TimerHandle) -> Option<Duration> {
        self.deadlines.get(&id.0).copied()
    }

    /// Pop the earliest task due at or before `until`, moving the clock to
    /// its deadline
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerHandle, T)> {
        let (&(deadline, id), _) = self.pending.iter().next()?;
        if deadline > until {
            return None;
        }
        let task = self.pending.remove(&(deadline, id))?;
        self.deadlines.remove(&id);
        self.now = self.now.max(deadline);
        Some((TimerHandle(id), task))
    }

    /// Drop every pending task; the clock keeps its time
    pub fn clear(&mut self) {
        self.pending.clear();
        self.deadlines.clear();
    }

    /// Move the clock forward without firing anything
    pub fn advance_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_pop_in_deadline_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(300), "late");
        queue.schedule(ms(100), "early");
        queue.schedule(ms(100), "early-second");

        assert_eq!(queue.pop_due(ms(50)), None);
        assert_eq!(queue.pop_due(ms(500)).map(|(_, t)| t), Some("early"));
        assert_eq!(queue.now(), ms(100));
        assert_eq!(queue.pop_due(ms(500)).map(|(_, t)| t), Some("early-second"));
        assert_eq!(queue.pop_due(ms(500)).map(|(_, t)| t), Some("late"));
        assert_eq!(queue.pop_due(ms(10_000)), None);
    }

    #[test]
    fn test_cancel() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule(ms(10), 1);
        assert_eq!(queue.deadline(id), Some(ms(10)));
        assert_eq!(queue.cancel(id), Some(1));
        assert_eq!(queue.deadline(id), None);
        assert_eq!(queue.cancel(id), None);
        assert_eq!(queue.pop_due(ms(100)), None);
    }

    #[test]
    fn test_schedule_is_relative_to_clock() {
        let mut queue = TimerQueue::new();
        queue.advance_to(ms(1000));
        let id = queue.schedule(ms(200), ());
        assert_eq!(queue.deadline(id), Some(ms(1200)));

        // The clock never runs backwards
        queue.advance_to(ms(10));
        assert_eq!(queue.now(), ms(1000));
    }
}
