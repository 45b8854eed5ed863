//! Epoch-tagged timer queue on a virtual clock.
//!
//! [`Scheduler`] holds pending tasks in a min-heap keyed by due time. Every
//! task records the epoch that was current when it was scheduled. Calling
//! [`Scheduler::restart`] or [`Scheduler::cancel_all`] starts a new epoch;
//! tasks from older epochs stay in the heap but are dropped, never
//! delivered, when they come due.
//!
//! The clock only moves when the owner calls [`Scheduler::pop_due`] or
//! [`Scheduler::advance_to`], so the queue is fully deterministic.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;
use std::time::Duration;

/// A restart generation. Tasks only fire within their own epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch(u64);

impl Epoch {
    /// Returns the raw counter.
    pub fn as_raw(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle for a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// A task that has come due.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fired<T> {
    /// The task's handle.
    pub id: TimerId,
    /// Epoch the task was scheduled under.
    pub epoch: Epoch,
    /// Virtual time at which it fired.
    pub due: Duration,
    /// The task payload.
    pub payload: T,
}

#[derive(Debug)]
struct Entry<T> {
    due: Duration,
    // tie-breaker: FIFO among tasks due at the same instant
    seq: u64,
    epoch: Epoch,
    payload: T,
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
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Virtual-time scheduler with epoch-based cancellation.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    epoch: Epoch,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Entry<T>>>,
    dropped: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    /// Creates an empty scheduler at time zero, epoch zero.
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            epoch: Epoch::default(),
            next_seq: 0,
            queue: BinaryHeap::new(),
            dropped: 0,
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Current epoch.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Number of stale tasks discarded so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Schedules `payload` to fire `delay` from now in the current epoch.
    pub fn schedule_after(&mut self, delay: Duration, payload: T) -> TimerId {
        self.schedule_at(self.now + delay, payload)
    }

    /// Schedules `payload` at an absolute virtual time in the current epoch.
    ///
    /// A time in the past fires on the next [`pop_due`](Self::pop_due).
    pub fn schedule_at(&mut self, due: Duration, payload: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Entry {
            due: due.max(self.now),
            seq,
            epoch: self.epoch,
            payload,
        }));
        TimerId(seq)
    }

    /// Invalidates every pending task without moving the clock.
    pub fn cancel_all(&mut self) -> Epoch {
        self.epoch = self.epoch.next();
        self.epoch
    }

    /// Starts a new epoch with the clock back at zero.
    ///
    /// Old tasks are purged eagerly here since their due times would no
    /// longer be comparable with the rewound clock.
    pub fn restart(&mut self) -> Epoch {
        self.dropped += self.queue.len() as u64;
        self.queue.clear();
        self.now = Duration::ZERO;
        self.cancel_all()
    }

    /// Number of live tasks in the current epoch.
    pub fn active(&self) -> usize {
        self.queue
            .iter()
            .filter(|Reverse(e)| e.epoch == self.epoch)
            .count()
    }

    /// Due time of the earliest live task, if any.
    pub fn next_due(&self) -> Option<Duration> {
        self.queue
            .iter()
            .filter(|Reverse(e)| e.epoch == self.epoch)
            .map(|Reverse(e)| e.due)
            .min()
    }

    /// Pops the earliest live task due at or before `until`.
    ///
    /// Moves the clock to the task's due time. Stale tasks encountered on
    /// the way are discarded. Returns `None` once nothing else is due; the
    /// clock is then left where it was, use [`advance_to`](Self::advance_to)
    /// to settle it.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired<T>> {
        loop {
            let due = match self.queue.peek() {
                Some(Reverse(e)) if e.due <= until => e.due,
                _ => return None,
            };
            let Reverse(entry) = self.queue.pop()?;
            if entry.epoch != self.epoch {
                self.dropped += 1;
                tracing::trace!(
                    stale = %entry.epoch,
                    current = %self.epoch,
                    "dropping superseded timer"
                );
                continue;
            }
            self.now = self.now.max(due);
            return Some(Fired {
                id: TimerId(entry.seq),
                epoch: entry.epoch,
                due,
                payload: entry.payload,
            });
        }
    }

    /// Moves the clock forward to `t` without firing anything.
    pub fn advance_to(&mut self, t: Duration) {
        self.now = self.now.max(t);
    }
}
