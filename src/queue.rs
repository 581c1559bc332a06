use super::errors::PoolError;
use super::handle::Task;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueueState {
    /// Accepting submissions and serving workers.
    Open,
    /// Graceful shutdown: intake closed, queued tasks still served.
    Draining,
    /// Immediate shutdown: intake closed, queue emptied, workers stop.
    Closed,
}

/// Sentinel-bearing dequeue outcome.
pub(crate) enum Dequeued {
    Task(Task),
    /// No more work, pool stopping.
    Stop,
}

/// FIFO task queue guarded by one lock; a condvar parks idle workers.
///
/// The lock is held only for the O(1) queue operation itself, never across
/// task execution.
pub(crate) struct TaskQueue {
    inner: Mutex<QueueInner>,
    not_empty: Condvar,
}

struct QueueInner {
    tasks: VecDeque<Task>,
    state: QueueState,
}

impl TaskQueue {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(QueueInner {
                tasks: VecDeque::new(),
                state: QueueState::Open,
            }),
            not_empty: Condvar::new(),
        }
    }

    /// Append to the tail and wake one parked worker, if any.
    pub(crate) fn push(&self, task: Task) -> Result<(), PoolError> {
        let mut inner = self.inner.lock();
        if inner.state != QueueState::Open {
            return Err(PoolError::PoolClosed);
        }
        inner.tasks.push_back(task);
        drop(inner);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Remove and return the head, blocking while the queue is empty and the
    /// pool is running. Returns [`Dequeued::Stop`] once shutdown leaves no
    /// further work. Each task is handed out at most once.
    pub(crate) fn pop_blocking(&self) -> Dequeued {
        let mut inner = self.inner.lock();
        loop {
            if inner.state == QueueState::Closed {
                return Dequeued::Stop;
            }
            if let Some(task) = inner.tasks.pop_front() {
                return Dequeued::Task(task);
            }
            if inner.state == QueueState::Draining {
                return Dequeued::Stop;
            }
            self.not_empty.wait(&mut inner);
        }
    }

    /// Close intake, leaving queued tasks to drain. Idempotent; never
    /// rewinds a `Closed` queue to `Draining`.
    pub(crate) fn close(&self) {
        let mut inner = self.inner.lock();
        if inner.state == QueueState::Open {
            inner.state = QueueState::Draining;
        }
        drop(inner);
        self.not_empty.notify_all();
    }

    /// Close intake and pull every unexecuted task out of the queue. The
    /// caller owns abandoning them.
    pub(crate) fn close_immediate(&self) -> Vec<Task> {
        let mut inner = self.inner.lock();
        inner.state = QueueState::Closed;
        let abandoned: Vec<Task> = inner.tasks.drain(..).collect();
        drop(inner);
        self.not_empty.notify_all();
        abandoned
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.lock().tasks.len()
    }
}
