use super::errors::{PoolError, TaskResult};
use super::model::TaskStatus;
use parking_lot::{Condvar, Mutex};
use std::{
    any::Any,
    fmt,
    panic::{catch_unwind, AssertUnwindSafe},
    sync::Arc,
    time::{Duration, Instant},
};

/// Type-erased unit of work held by the queue.
pub(crate) type Task = Box<dyn Runnable>;

/// A task is either executed exactly once or abandoned exactly once.
pub(crate) trait Runnable: Send {
    /// Execute the task and fulfill its result channel. Returns `false` if
    /// the closure panicked.
    fn run(self: Box<Self>) -> bool;

    /// Fulfill the result channel with `PoolClosed` without running.
    fn abandon(self: Box<Self>);
}

/// Couples a submitted closure with the result channel its handle reads.
pub(crate) struct Job<F, T> {
    func: F,
    cell: Arc<ResultCell<T>>,
}

impl<F, T> Job<F, T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    pub(crate) fn new(func: F) -> (Self, JoinHandle<T>) {
        let cell = Arc::new(ResultCell::new());
        let handle = JoinHandle { cell: cell.clone() };
        (Self { func, cell }, handle)
    }
}

impl<F, T> Runnable for Job<F, T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    fn run(self: Box<Self>) -> bool {
        let Job { func, cell } = *self;
        match catch_unwind(AssertUnwindSafe(func)) {
            Ok(value) => {
                cell.fulfill(Ok(value));
                true
            }
            Err(payload) => {
                cell.fulfill(Err(PoolError::TaskPanicked(panic_message(payload))));
                false
            }
        }
    }

    fn abandon(self: Box<Self>) {
        self.cell.fulfill(Err(PoolError::PoolClosed));
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

enum CellState<T> {
    Pending,
    Done(TaskResult<T>),
    Taken,
}

/// One-shot result channel shared between one worker and one submitter.
///
/// Exactly one transition out of `Pending` is permitted; a second `fulfill`
/// panics with [`PoolError::DoubleFulfillment`].
pub(crate) struct ResultCell<T> {
    state: Mutex<CellState<T>>,
    cond: Condvar,
}

impl<T> ResultCell<T> {
    fn new() -> Self {
        Self {
            state: Mutex::new(CellState::Pending),
            cond: Condvar::new(),
        }
    }

    pub(crate) fn fulfill(&self, outcome: TaskResult<T>) {
        let mut state = self.state.lock();
        if !matches!(*state, CellState::Pending) {
            panic!("{}", PoolError::DoubleFulfillment);
        }
        *state = CellState::Done(outcome);
        drop(state);
        self.cond.notify_all();
    }

    fn wait(&self) -> TaskResult<T> {
        let mut state = self.state.lock();
        while matches!(*state, CellState::Pending) {
            self.cond.wait(&mut state);
        }
        match std::mem::replace(&mut *state, CellState::Taken) {
            CellState::Done(outcome) => outcome,
            // `wait` consumes the handle, the sole reader.
            _ => panic!("one-shot result read twice"),
        }
    }

    fn status(&self) -> TaskStatus {
        match *self.state.lock() {
            CellState::Pending => TaskStatus::Pending,
            _ => TaskStatus::Done,
        }
    }

    fn wait_until_done(&self, timeout: Duration) -> TaskStatus {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        while matches!(*state, CellState::Pending) {
            if self.cond.wait_until(&mut state, deadline).timed_out() {
                break;
            }
        }
        match *state {
            CellState::Pending => TaskStatus::Pending,
            _ => TaskStatus::Done,
        }
    }
}

/// Submitter-facing handle to one task's outcome.
pub struct JoinHandle<T> {
    cell: Arc<ResultCell<T>>,
}

impl<T> JoinHandle<T> {
    /// Block until the task reaches a terminal state; returns its value or
    /// the propagated failure. Consumes the handle, so the outcome is
    /// delivered at most once.
    pub fn wait(self) -> TaskResult<T> {
        self.cell.wait()
    }

    /// Non-blocking completion check.
    pub fn poll(&self) -> TaskStatus {
        self.cell.status()
    }

    /// Block up to `timeout` for the task to finish, reporting the status
    /// reached. The handle stays usable either way.
    pub fn wait_timeout(&self, timeout: Duration) -> TaskStatus {
        self.cell.wait_until_done(timeout)
    }

    pub fn is_finished(&self) -> bool {
        self.poll() == TaskStatus::Done
    }
}

// Not derivable: the cell holds no `Debug` bound on `T`. Reports the channel
// status instead of the value.
impl<T> fmt::Debug for JoinHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinHandle")
            .field("status", &self.poll())
            .finish()
    }
}
