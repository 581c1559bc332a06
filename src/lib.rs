//! Blocking worker thread pool with one-shot result handles
//!
//! # Features
//! - Fixed set of long-lived OS worker threads over a shared FIFO queue
//! - Type-erased tasks: submit any `FnOnce() -> T` closure
//! - Per-task result channel: blocking `wait()` or non-blocking `poll()`
//! - Panic isolation: a panicking task never takes its worker down
//! - Graceful and immediate shutdown, idempotent, graceful on drop
//! - Pool metrics (submitted / completed / failed / queued)

pub mod errors;
pub mod handle;
pub mod model;
pub mod pool;
mod queue;

pub use errors::{PoolError, TaskResult};
pub use handle::JoinHandle;
pub use model::{PoolMetrics, ShutdownMode, TaskStatus};
pub use pool::{Config, ThreadPool, ThreadPoolInner};
