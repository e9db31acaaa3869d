//! Cancelable task scheduling.
//!
//! The coordinator's only suspension points are scheduled continuations:
//! the settle-delay push in `pop_and_push` and the transient-overlay
//! auto-clear. Both go through the [`Scheduler`] trait so the library stays
//! runtime-agnostic, and both return a [`TaskHandle`] that the owning
//! coordinator cancels on conflicting navigation or teardown, preventing
//! stale transitions.
//!
//! [`TokioScheduler`] is the production implementation;
//! [`ManualScheduler`] is a deterministic queue driven by
//! [`advance`](ManualScheduler::advance) for tests and simulation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

/// Minimum interval that lets a pop transition settle before the next push
/// begins.
pub const SETTLE_DELAY: Duration = Duration::from_millis(550);

/// Unit of deferred work.
pub type Task = Box<dyn FnOnce() + Send>;

/// Cancellation handle for a scheduled task.
///
/// Cancelling after the task has run is a no-op; cancelling twice is a
/// no-op.
#[derive(Clone, Debug, Default)]
pub struct TaskHandle {
    cancelled: Arc<AtomicBool>,
}

impl TaskHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prevent the task from running if it has not run yet.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Posts tasks back onto the hosting timeline after a delay.
pub trait Scheduler: Send + Sync {
    /// Schedule `task` to run once after `delay`. The returned handle
    /// cancels the task if it has not yet run.
    ///
    /// Implementations must not run `task` inline before returning;
    /// callers may hold locks the task acquires.
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle;
}

/// Tokio-backed scheduler; requires a running runtime.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let handle = TaskHandle::new();
        let guard = handle.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !guard.is_cancelled() {
                task();
            }
        });
        handle
    }
}

struct ManualEntry {
    deadline: Duration,
    sequence: u64,
    handle: TaskHandle,
    task: Task,
}

#[derive(Default)]
struct ManualQueue {
    now: Duration,
    next_sequence: u64,
    pending: Vec<ManualEntry>,
}

/// Deterministic scheduler: time only passes through
/// [`advance`](Self::advance), and due tasks run in deadline order
/// (insertion order breaks ties). Tasks run outside the queue lock, so a
/// task may itself schedule further work.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Arc<Mutex<ManualQueue>>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks that have not yet run (cancelled ones included
    /// until their deadline passes).
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.lock().pending.len()
    }

    /// Move the clock forward and run every task whose deadline has
    /// arrived. The clock steps through each deadline in turn, so a task
    /// that schedules follow-up work measures its delay from its own
    /// deadline, not from the end of the advance.
    pub fn advance(&self, by: Duration) {
        let target = {
            let queue = self.queue.lock();
            queue.now + by
        };

        loop {
            let entry = {
                let mut queue = self.queue.lock();
                let due = queue
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, entry)| entry.deadline <= target)
                    .min_by_key(|(_, entry)| (entry.deadline, entry.sequence))
                    .map(|(index, _)| index);
                match due {
                    Some(index) => {
                        let entry = queue.pending.remove(index);
                        queue.now = queue.now.max(entry.deadline);
                        entry
                    }
                    None => {
                        queue.now = target;
                        break;
                    }
                }
            };
            if !entry.handle.is_cancelled() {
                (entry.task)();
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let handle = TaskHandle::new();
        let mut queue = self.queue.lock();
        let deadline = queue.now + delay;
        let sequence = queue.next_sequence;
        queue.next_sequence += 1;
        queue.pending.push(ManualEntry {
            deadline,
            sequence,
            handle: handle.clone(),
            task,
        });
        handle
    }
}
