use std::{cmp::Reverse, collections::BinaryHeap};

use crate::session::clock::Millis;

/// Deferred page work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Task {
    ApplyFlash,
    RemoveFlash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Pending {
    due: Millis,
    seq: u64,
    task: Task,
}

/// One-shot timers, fired in due order. Nothing is ever cancelled.
#[derive(Debug, Clone, Default)]
pub struct Timers {
    queue: BinaryHeap<Reverse<Pending>>,
    seq: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Millis, delay_ms: u64, task: Task) -> Millis {
        let delay = Millis::try_from(delay_ms).unwrap_or(Millis::MAX);
        let due = now.saturating_add(delay);

        self.queue.push(Reverse(Pending {
            due,
            seq: self.seq,
            task,
        }));
        self.seq += 1;

        due
    }

    /// Takes the earliest task due at or before `now`, with its due time.
    /// Timers due at the same instant come out in scheduling order.
    pub fn pop_due(&mut self, now: Millis) -> Option<(Millis, Task)> {
        let Reverse(next) = self.queue.peek()?;

        if next.due > now {
            return None;
        }

        self.queue
            .pop()
            .map(|Reverse(pending)| (pending.due, pending.task))
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.queue.peek().map(|Reverse(pending)| pending.due)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Task, Timers};

    #[test]
    fn nothing_fires_early() {
        let mut timers = Timers::new();
        timers.schedule(100, 50, Task::ApplyFlash);

        assert_eq!(timers.pop_due(149), None);
        assert_eq!(timers.pop_due(150), Some((150, Task::ApplyFlash)));
        assert!(timers.is_empty());
    }

    #[test]
    fn fires_in_due_order() {
        let mut timers = Timers::new();
        timers.schedule(0, 500, Task::RemoveFlash);
        timers.schedule(0, 50, Task::ApplyFlash);
        timers.schedule(0, 500, Task::ApplyFlash);

        assert_eq!(timers.next_due(), Some(50));
        assert_eq!(timers.pop_due(1_000), Some((50, Task::ApplyFlash)));
        assert_eq!(timers.pop_due(1_000), Some((500, Task::RemoveFlash)));
        assert_eq!(timers.pop_due(1_000), Some((500, Task::ApplyFlash)));
        assert_eq!(timers.pop_due(1_000), None);
    }

    #[test]
    fn huge_delays_saturate() {
        let mut timers = Timers::new();
        let due = timers.schedule(10, u64::MAX, Task::RemoveFlash);

        assert_eq!(due, i64::MAX);
        assert_eq!(timers.len(), 1);
    }
}
