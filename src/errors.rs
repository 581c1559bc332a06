use thiserror::Error;

pub type TaskResult<T> = Result<T, PoolError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The submitted closure panicked. The payload is delivered through the
    /// task's handle; the worker that ran it keeps serving.
    #[error("task panicked: {0}")]
    TaskPanicked(String),
    /// Submission after shutdown began, or a task abandoned by an immediate
    /// shutdown.
    #[error("pool is shut down")]
    PoolClosed,
    /// A result channel was fulfilled twice. Invariant violation, surfaced
    /// as a panic rather than a returned error.
    #[error("result channel fulfilled twice")]
    DoubleFulfillment,
}
