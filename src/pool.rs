use super::{
    errors::PoolError,
    handle::{Job, JoinHandle},
    model::{PoolMetrics, ShutdownMode},
    queue::{Dequeued, TaskQueue},
};
use parking_lot::Mutex;
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
};
use tracing::{debug, trace};

/// Construction-time pool configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of parallel worker threads spawned, fixed for the pool's
    /// lifetime. Must be positive.
    pub worker_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            worker_count: num_cpus::get().max(1),
        }
    }
}

impl Config {
    pub fn with_workers(worker_count: usize) -> Self {
        Self { worker_count }
    }
}

pub type ThreadPool = Arc<ThreadPoolInner>;

/// Queue and counters shared with the workers. Workers hold this, not the
/// pool itself, so dropping the last pool handle still tears down.
struct Shared {
    queue: TaskQueue,
    submitted: AtomicUsize,
    completed: AtomicUsize,
    failed: AtomicUsize,
}

/// Fixed-size blocking thread pool over a shared FIFO queue.
///
/// All state is instance-scoped: the queue, its lock, the worker set and the
/// shutdown flag live inside the pool and are torn down on drop.
pub struct ThreadPoolInner {
    shared: Arc<Shared>,
    workers: Mutex<Vec<thread::JoinHandle<()>>>,
    config: Config,
}

impl ThreadPoolInner {
    pub fn new(worker_count: usize) -> ThreadPool {
        Self::with_config(Config { worker_count })
    }

    pub fn with_config(config: Config) -> ThreadPool {
        assert!(config.worker_count > 0, "worker_count must be positive");

        let shared = Arc::new(Shared {
            queue: TaskQueue::new(),
            submitted: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        });

        let mut workers = Vec::with_capacity(config.worker_count);
        for id in 0..config.worker_count {
            let shared = Arc::clone(&shared);
            let handle = thread::Builder::new()
                .name(format!("workpool-worker-{id}"))
                .spawn(move || worker_loop(id, shared))
                .expect("failed to spawn worker thread");
            workers.push(handle);
        }
        debug!(workers = config.worker_count, "thread pool started");

        Arc::new(ThreadPoolInner {
            shared,
            workers: Mutex::new(workers),
            config,
        })
    }

    /// Enqueue `func` for execution on some worker and return the handle to
    /// its outcome. Exactly one task is appended per successful call.
    ///
    /// Fails fast with [`PoolError::PoolClosed`] once shutdown has begun;
    /// the closure is dropped unexecuted in that case.
    pub fn submit<F, T>(&self, func: F) -> Result<JoinHandle<T>, PoolError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (job, handle) = Job::new(func);
        self.shared.submitted.fetch_add(1, Ordering::Relaxed);
        if let Err(err) = self.shared.queue.push(Box::new(job)) {
            self.shared.submitted.fetch_sub(1, Ordering::Relaxed);
            return Err(err);
        }
        Ok(handle)
    }

    /// Wind the pool down and join every worker thread. Idempotent: a second
    /// call finds no workers left to join and returns immediately.
    pub fn shutdown(&self, mode: ShutdownMode) {
        match mode {
            ShutdownMode::Graceful => self.shared.queue.close(),
            ShutdownMode::Immediate => {
                let abandoned = self.shared.queue.close_immediate();
                if !abandoned.is_empty() {
                    debug!(count = abandoned.len(), "abandoning queued tasks");
                }
                for task in abandoned {
                    self.shared.failed.fetch_add(1, Ordering::Relaxed);
                    task.abandon();
                }
            }
        }

        let workers: Vec<_> = self.workers.lock().drain(..).collect();
        if workers.is_empty() {
            return;
        }
        for handle in workers {
            let _ = handle.join();
        }
        debug!("thread pool stopped");
    }

    pub fn worker_count(&self) -> usize {
        self.config.worker_count
    }

    pub fn metrics(&self) -> PoolMetrics {
        PoolMetrics {
            workers: self.config.worker_count,
            queued_tasks: self.shared.queue.len(),
            submitted_tasks: self.shared.submitted.load(Ordering::Relaxed),
            completed_tasks: self.shared.completed.load(Ordering::Relaxed),
            failed_tasks: self.shared.failed.load(Ordering::Relaxed),
        }
    }
}

impl Drop for ThreadPoolInner {
    fn drop(&mut self) {
        self.shutdown(ShutdownMode::Graceful);
    }
}

/// Idle -> Running -> Idle until the queue reports no further work. A panic
/// inside a task is captured into its result channel by `Runnable::run` and
/// never unwinds past it, so the loop body stays straight-line.
fn worker_loop(id: usize, shared: Arc<Shared>) {
    trace!(worker = id, "worker started");
    loop {
        match shared.queue.pop_blocking() {
            Dequeued::Task(task) => {
                if task.run() {
                    shared.completed.fetch_add(1, Ordering::Relaxed);
                } else {
                    shared.failed.fetch_add(1, Ordering::Relaxed);
                }
            }
            Dequeued::Stop => break,
        }
    }
    trace!(worker = id, "worker stopped");
}
