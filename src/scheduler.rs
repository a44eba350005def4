//! Deterministic scheduled continuations on a logical clock.
//!
//! The engine never sleeps. Anything that must happen "later" (the next
//! auto-complete step, the end of a deck reset animation) is queued here
//! with a due time, and runs when the host advances the clock. Every
//! scheduled task carries a `CancellationToken`; a cancelled task is
//! dropped instead of run.
//!
//! Tasks run in due-time order; ties run in scheduling order.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Shared cancellation flag for one scheduled task.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

#[derive(Debug)]
struct Scheduled<T> {
    due: Duration,
    handle: TaskHandle,
    token: CancellationToken,
    task: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    queue: Vec<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Scheduler {
            now: Duration::ZERO,
            next_id: 0,
            queue: Vec::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queue `task` to run `delay` after the current time. The clock
    /// saturates at `Duration::MAX`.
    pub fn schedule(&mut self, delay: Duration, task: T) -> (TaskHandle, CancellationToken) {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        let token = CancellationToken::new();
        self.queue.push(Scheduled {
            due: self.now.saturating_add(delay),
            handle,
            token: token.clone(),
            task,
        });
        (handle, token)
    }

    /// Cancel a task by handle. Returns whether it was still queued.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        match self.queue.iter().find(|s| s.handle == handle) {
            Some(entry) => {
                entry.token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for entry in &self.queue {
            entry.token.cancel();
        }
        self.queue.clear();
    }

    /// Number of queued tasks that are not cancelled.
    pub fn pending(&self) -> usize {
        self.queue.iter().filter(|s| !s.token.is_cancelled()).count()
    }

    /// Due time of the earliest live task.
    pub fn next_due(&self) -> Option<Duration> {
        self.queue
            .iter()
            .filter(|s| !s.token.is_cancelled())
            .map(|s| s.due)
            .min()
    }

    /// Pop the earliest live task due at or before `deadline`, moving the
    /// clock to its due time.
    ///
    /// Callers drain in a loop so that tasks scheduled by a running task
    /// are picked up within the same advance.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<T> {
        self.queue.retain(|s| !s.token.is_cancelled());
        let idx = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= deadline)
            .min_by_key(|(_, s)| (s.due, s.handle))
            .map(|(idx, _)| idx)?;
        let entry = self.queue.remove(idx);
        self.now = self.now.max(entry.due);
        Some(entry.task)
    }

    /// Finish an advance: the clock lands on `deadline`.
    pub fn settle_at(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }

    /// Drain and return every task due within `elapsed`, in order. Tasks
    /// scheduled while the result is processed are not included.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<T> {
        let deadline = self.now.saturating_add(elapsed);
        let mut due = Vec::new();
        while let Some(task) = self.pop_due(deadline) {
            due.push(task);
        }
        self.settle_at(deadline);
        due
    }
}
