//! Virtual-clock timer queue.
//!
//! Stand-in for `setTimeout`/`setInterval`: the host advances the clock and
//! the runtime pops due timers one at a time, so a firing timer can schedule
//! follow-ups relative to its own due time.

/// Handle returned by the scheduling calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer<T> {
    id: TimerId,
    seq: u64,
    due: u64,
    interval: Option<u64>,
    task: T,
}

/// Pending timers ordered by due time, ties by scheduling order.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    now: u64,
    next_id: u64,
    next_seq: u64,
    pending: Vec<Timer<T>>,
}

impl<T: Clone> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 0,
            next_seq: 0,
            pending: Vec::new(),
        }
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    fn push(&mut self, delay: u64, interval: Option<u64>, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let seq = self.bump_seq();
        self.pending.push(Timer {
            id,
            seq,
            due: self.now + delay,
            interval,
            task,
        });
        id
    }

    fn bump_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    pub fn set_timeout(&mut self, delay_ms: u64, task: T) -> TimerId {
        self.push(delay_ms, None, task)
    }

    /// Repeat every `period_ms` (at least 1 ms) until cleared.
    pub fn set_interval(&mut self, period_ms: u64, task: T) -> TimerId {
        let period = period_ms.max(1);
        self.push(period, Some(period), task)
    }

    pub fn clear(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.pending.iter().map(|t| t.due).min()
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its due time. Intervals are re-armed before being returned.
    pub fn pop_due(&mut self, until: u64) -> Option<(TimerId, T)> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(i, _)| i)?;

        let timer = self.pending.remove(idx);
        self.now = self.now.max(timer.due);
        if let Some(period) = timer.interval {
            // Re-armed with the same id so `clear` keeps working.
            let seq = self.bump_seq();
            self.pending.push(Timer {
                id: timer.id,
                seq,
                due: timer.due + period,
                interval: Some(period),
                task: timer.task.clone(),
            });
        }
        Some((timer.id, timer.task))
    }

    /// Move the clock forward without firing anything.
    pub fn settle(&mut self, until: u64) {
        self.now = self.now.max(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(q: &mut TimerQueue<&'static str>, until: u64) -> Vec<(u64, &'static str)> {
        let mut out = Vec::new();
        while let Some((_, task)) = q.pop_due(until) {
            out.push((q.now(), task));
        }
        q.settle(until);
        out
    }

    #[test]
    fn fires_in_due_order() {
        let mut q = TimerQueue::new();
        q.set_timeout(30, "b");
        q.set_timeout(10, "a");
        q.set_timeout(30, "c");
        assert_eq!(drain(&mut q, 100), vec![(10, "a"), (30, "b"), (30, "c")]);
        assert!(q.is_empty());
        assert_eq!(q.now(), 100);
    }

    #[test]
    fn interval_repeats_until_cleared() {
        let mut q = TimerQueue::new();
        let id = q.set_interval(35, "tick");
        assert_eq!(drain(&mut q, 105).len(), 3);
        assert!(q.clear(id));
        assert!(drain(&mut q, 1000).is_empty());
    }

    #[test]
    fn not_due_stays_pending() {
        let mut q = TimerQueue::new();
        q.set_timeout(50, "later");
        assert!(drain(&mut q, 49).is_empty());
        assert_eq!(q.next_due(), Some(50));
    }
}
